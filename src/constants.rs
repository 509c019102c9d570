pub const USER_AGENT: &str = "chemlab/0.1";

pub mod defaults {

    pub const UNIT: &str = "pieces";

    pub const MIN_STOCK_LEVEL: i64 = 5;

    pub const RECENT_ACTIVITY: usize = 5;
}

pub mod upload {

    pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

    pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
}

pub mod limits {

    pub const MIN_PASSWORD_LEN: usize = 6;

    pub const MAX_ERROR_BODY: usize = 500;
}

pub mod export {

    pub const PLACEHOLDER: &str = "N/A";

    pub const ITEMS_FILE: &str = "chem-lab-items.csv";

    pub const BORROW_LOGS_FILE: &str = "borrow-logs.csv";

    pub const LOW_STOCK_FILE: &str = "inventory-report.csv";

    pub const EXPIRED_FILE: &str = "expired-items-report.csv";

    pub const OVERDUE_FILE: &str = "borrowed-items-report.csv";
}
