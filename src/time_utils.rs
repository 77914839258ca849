use std::sync::OnceLock;

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;

fn ts_ui_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse(
            "[year]-[month repr:numerical padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero]",
        )
        .unwrap_or_default()
    })
}

/// `2026-01-22 09:15:02` for an RFC 3339 timestamp; anything unparsable is
/// shown as given.
pub fn fmt_ts_ui(ts: &str) -> String {
    OffsetDateTime::parse(ts, &Rfc3339)
        .ok()
        .and_then(|dt| dt.to_offset(time::UtcOffset::UTC).format(ts_ui_format()).ok())
        .unwrap_or_else(|| ts.to_string())
}
