pub mod io;
pub mod record;
