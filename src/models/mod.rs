pub mod control;
pub mod file;
pub mod handoff;
pub mod loaders;
pub mod mode;
pub mod record;

pub use control::{display_label, FieldControl, SelectedField, Treatment};
pub use file::{FileKind, UploadedFile};
pub use handoff::{Handoff, HandoffItem, HandoffPayload};
pub use loaders::{load_all_files, load_file};
pub use mode::{Destination, Mode};
pub use record::{KeyDescriptor, ProcessedFileRecord};
