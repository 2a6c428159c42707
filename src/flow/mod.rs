pub mod draft;
pub mod field;
pub mod navigation;
pub mod registry;
pub mod validator;

pub use draft::Draft;
pub use field::{AttachmentRef, FieldDescriptor, FieldKind, FieldValue};
pub use navigation::{FlowController, NavigationOutcome, ResumeQuery};
pub use registry::{FlowDescriptor, StepDescriptor};
pub use validator::{validate_step, CrossFieldRule, FieldViolation, ViolationKind};
