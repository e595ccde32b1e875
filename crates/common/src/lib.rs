//! Shared plumbing for the workspace: logging setup, runtime/env checks and
//! small wire types reused by the server and binaries.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok", storage: "file".into() };
        assert_eq!(h.status, "ok");
        let v = serde_json::to_value(&h).unwrap();
        assert_eq!(v["storage"], "file");
    }
}
