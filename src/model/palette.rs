pub const GOLD: &str = "#c9a84c";
pub const BLUE: &str = "#3b82f6";
pub const GREEN: &str = "#22c55e";
pub const RED: &str = "#ef4444";
pub const AMBER: &str = "#f59e0b";
pub const PURPLE: &str = "#a855f7";
pub const CYAN: &str = "#06b6d4";
pub const SLATE: &str = "#475569";

/// Fallback for states and chart series without a palette entry.
pub const NEUTRAL: &str = "#94a3b8";
/// Fallback for dispositions without a palette entry.
pub const DISPOSITION_FALLBACK: &str = "#475569";

pub fn disposition_color(name: &str) -> &'static str {
    match name {
        "PTP" => GREEN,
        "RTP" => RED,
        "Not_Evaluated" => AMBER,
        "Callback" => BLUE,
        "Connected_No_Outcome" => PURPLE,
        "Unreachable" => SLATE,
        _ => DISPOSITION_FALLBACK,
    }
}

pub fn state_color(name: &str) -> &'static str {
    match name {
        "active" => BLUE,
        "inactive" => SLATE,
        "completed" => GREEN,
        _ => NEUTRAL,
    }
}

/// Colours for the four canonical score components, cycled for extras.
pub fn component_color(index: usize) -> &'static str {
    const ROW: [&str; 4] = [BLUE, GREEN, PURPLE, GOLD];
    ROW[index % ROW.len()]
}

pub fn display_label(key: &str) -> String {
    key.replace('_', " ")
}
