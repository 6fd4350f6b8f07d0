pub mod constants;
mod manuscript;
mod numbering;
mod options;
mod paginate;
mod preview;
mod store;
mod types;

pub use manuscript::*;
pub use numbering::{Label, NumberedChapter, NumberedUnit, number_chapter, number_chapters};
pub use options::*;
pub use paginate::{Page, PageEntry, paginate, paginate_chapter, running_header_for};
pub use preview::{PreviewMode, PreviewState};
pub use store::{EXPORT_FILE_NAME, ManuscriptStore, export_json, from_json, to_json};
pub use types::*;
