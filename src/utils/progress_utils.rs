use indicatif::ProgressStyle;
use tracing::{info_span, Span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// A span carrying a progress bar of `len` steps. The bar is drawn while the span is
/// entered and an `IndicatifLayer` is installed; otherwise the calls are no-ops.
pub fn progress_bar(len: u64, msg: &str) -> Span {
    let span = info_span!("progress", task = msg);
    span.pb_set_style(&progress_style());
    span.pb_set_length(len);
    span.pb_set_message(msg);

    span
}
