pub const UNKNOWN_PERIOD: &str = "Unknown";

/// Derive a period label from an archive entry name.
///
/// The first `_`-separated token made of exactly six ASCII digits becomes
/// `first2-last4`, so `202403` yields `20-2403`. The slicing is positional and
/// not calendar aware; the labels only need to be stable grouping keys.
/// The whole entry path is split, so a folder such as `GSTR2B_032024_files/`
/// tags its contents. Only the final extension is dropped first, letting
/// `A_202401.json` tag as `20-2401`.
pub fn tag(filename: &str) -> String {
    let base_start = filename.rfind('/').map_or(0, |idx| idx + 1);
    let stem = match filename.rfind('.') {
        Some(idx) if idx > base_start => &filename[..idx],
        _ => filename,
    };
    stem.split('_')
        .find(|part| part.len() == 6 && part.bytes().all(|b| b.is_ascii_digit()))
        .map(|part| format!("{}-{}", &part[..2], &part[2..]))
        .unwrap_or_else(|| UNKNOWN_PERIOD.to_string())
}
