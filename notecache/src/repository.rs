mod errors;
mod notes;
mod profiles;

pub use errors::*;
pub use notes::NoteRepository;
pub use profiles::ProfileRepository;
