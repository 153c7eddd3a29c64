// Handlers are split by who may call them.
//
// public:    no token needed (service info, health, signup/login, reading a
//            box and submitting to it)
// protected: the request must carry an administrator bearer token; ownership
//            of the target box is checked by the services
pub mod protected;
pub mod public;

use uuid::Uuid;

/// Path ids that are not UUIDs can never match a record.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}
