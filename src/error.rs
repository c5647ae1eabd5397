use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("could not open page store")]
    Store,
    #[display("could not set up content provider")]
    Provider,
    #[display("could not load page templates")]
    Render,
    #[display("reconciliation failed")]
    Reconcile,
    #[display("could not write output")]
    Output,
}
