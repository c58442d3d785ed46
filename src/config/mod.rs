pub mod app;
pub mod rule_schema;

pub use app::AppConfig;
pub use rule_schema::{load_rule_schema, parse_rule_schema};
