mod page;

pub(crate) use self::page::{VersionRow, decode_version, encode_version};
