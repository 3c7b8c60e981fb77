pub(crate) mod auth;
pub(crate) mod csrf_cookie;
pub(crate) mod health_check;
mod hotels;
mod responses;
mod uploads;

pub use auth::*;
pub use csrf_cookie::*;
pub use health_check::*;
pub use hotels::*;
pub use responses::*;
pub use uploads::*;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
