pub mod component;
pub mod metatype;
pub mod snapshot;
pub mod value;

pub use component::{ComponentDescriptor, ReferenceDescriptor, ServiceDescriptor};
pub use metatype::{AttributeDefinition, Designate, MetaTypeDescriptor, ObjectClassDefinition};
pub use snapshot::{localize, LocalizationTable, Snapshot, LOCALIZATION_MARKER};
pub use value::FieldValue;
