pub mod action_log;
pub mod assignment;
pub mod complaint;
pub mod creator;
pub mod lookup;
pub mod media;
pub mod query;
pub mod upload;
pub mod work_request;

pub use action_log::{ActionLogger, ActionType, AuditEntry, RequestMeta};
pub use complaint::ComplaintService;
pub use creator::{Creator, CreatorKind};
pub use lookup::LookupService;
pub use media::MediaService;
pub use work_request::WorkRequestService;
