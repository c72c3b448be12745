pub mod excel;
pub mod notify;
pub mod scan;
pub mod staging;

pub use excel::{load_ground_truth, write_audit};
pub use notify::{HttpNotifier, NotificationSink};
pub use scan::scan_images;
pub use staging::StagingArea;
