#![deny(warnings)]
pub mod engine;
pub mod game;
pub mod model;
pub mod rules;
pub mod sim;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "euchre-sim"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "euchre-sim");
        assert!(!AppInfo::version().is_empty());
    }
}
