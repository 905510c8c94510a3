// Upload intake: validate the declared filename, then spool the bytes to a
// request-owned temporary file that is removed on every exit path.

pub mod temp_file;
pub mod validator;
