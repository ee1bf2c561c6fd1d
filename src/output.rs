use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Environment variable that silences acknowledgments and info lines
pub const QUIET_ENV: &str = "CONTACTBOOK_QUIET";

pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var(QUIET_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false)
    })
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
