//! # Consent Migration
//!
//! Moves or discards buffered batches when the tracking consent changes.
//!
//! | Previous     | New          | Operation                  |
//! |--------------|--------------|----------------------------|
//! | none         | any          | wipe pending               |
//! | GRANTED      | PENDING      | wipe pending               |
//! | NOT_GRANTED  | PENDING      | wipe pending               |
//! | PENDING      | NOT_GRANTED  | wipe pending               |
//! | PENDING      | GRANTED      | move pending into granted  |
//! | otherwise    |              | nothing                    |

mod migrator;
mod operation;


pub use migrator::{ConsentAwareFileMigrator, RetryPolicy};
pub use operation::MigrationOperation;
