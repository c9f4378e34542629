//! Record type definitions

pub mod batch;
pub mod inspection;
pub mod installation;
pub mod part;

pub use batch::BatchRecord;
pub use inspection::InspectionRecord;
pub use installation::InstallationRecord;
pub use part::PartRecord;
