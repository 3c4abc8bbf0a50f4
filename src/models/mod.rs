pub mod action_log;
pub mod agent;
pub mod complaint;
pub mod complaint_subtype;
pub mod complaint_type;
pub mod request_assign_smagent;
pub mod socialmedia_agent;
pub mod status;
pub mod subtown;
pub mod town;
pub mod user;
pub mod work_request;
pub mod work_request_media;

pub use action_log::Entity as ActionLog;
pub use agent::Entity as Agent;
pub use complaint::Entity as Complaint;
pub use complaint_subtype::{Entity as ComplaintSubtype, Model as ComplaintSubtypeModel};
pub use complaint_type::{Entity as ComplaintType, Model as ComplaintTypeModel};
pub use request_assign_smagent::Entity as RequestAssignSmAgent;
pub use socialmedia_agent::Entity as SocialmediaAgent;
pub use status::{Entity as Status, Model as StatusModel};
pub use subtown::{Entity as Subtown, Model as SubtownModel};
pub use town::{Entity as Town, Model as TownModel};
pub use user::Entity as User;
pub use work_request::Entity as WorkRequest;
pub use work_request_media::{Entity as WorkRequestMedia, Model as WorkRequestMediaModel};
