pub mod local_lock;
pub mod pg_advisory_lock;
