// Response status codes
pub const STATUS_CODE_OK: u16 = 200;
pub const STATUS_CODE_BAD_REQUEST: u16 = 400;

// Response status strings
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "Failed";

// Response messages
pub const MESSAGE_REGISTERED: &str = "User registered successfully";
pub const MESSAGE_VALIDATION_FAILED: &str = "Validation failed";

// User id prefixes
pub const PREFIX_DEFAULT: &str = "USR";
pub const PREFIX_STUDENT: &str = "STU";
pub const PREFIX_EMPLOYEE: &str = "EMP";
pub const PREFIX_ADMIN: &str = "ADM";

// Access levels
pub const ACCESS_LEVEL_BASIC: &str = "BASIC";
pub const ACCESS_LEVEL_STANDARD: &str = "STANDARD";
pub const ACCESS_LEVEL_FULL: &str = "FULL";

// Payload fields read when shaping success data
pub const FIELD_USER_TYPE: &str = "userType";
pub const FIELD_DEPARTMENT: &str = "department";
pub const FIELD_SECURITY_CLEARANCE: &str = "security_clearance";

// Environment keys
pub const ENV_RULES_PATH: &str = "RULES_PATH";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_USER_ID_STRATEGY: &str = "USER_ID_STRATEGY";
pub const ENV_STUDENT_ACCESS_DAYS: &str = "STUDENT_ACCESS_DAYS";

// Defaults
pub const DEFAULT_RULES_PATH: &str = "config/enhanced_requirements.json";
pub const DEFAULT_STUDENT_ACCESS_DAYS: u32 = 365;
pub const USER_ID_HEX_LEN: usize = 8;
