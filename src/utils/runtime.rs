use anyhow::Result;

/// Every invocation is short lived and strictly sequential, so a current thread runtime is all
/// the file operations need.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
