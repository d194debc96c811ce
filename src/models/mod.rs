pub mod admin;
pub mod anonymous_visit;
pub mod chat_request;
pub mod comment;
pub mod comment_like;
pub mod devis_request;
pub mod identity;
pub mod reply;
pub mod status;
pub mod subject;
pub mod user;

pub use admin::{Entity as Admin, Model as AdminModel};
pub use anonymous_visit::Entity as AnonymousVisit;
pub use chat_request::{Entity as ChatRequest, Model as ChatRequestModel};
pub use comment::{Entity as Comment, Model as CommentModel};
pub use comment_like::Entity as CommentLike;
pub use devis_request::{Entity as DevisRequest, Model as DevisRequestModel};
pub use identity::{Identity, IdentityKind};
pub use reply::{Entity as Reply, Model as ReplyModel};
pub use status::RequestStatus;
pub use subject::{Entity as Subject, Model as SubjectModel};
pub use user::{Entity as User, Model as UserModel};
