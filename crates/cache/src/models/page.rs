use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use folio_storage::Version;

#[derive(sqlx::FromRow)]
pub(crate) struct VersionRow {
    pub(crate) id: String,
    pub(crate) version: i64,
}

impl TryFrom<VersionRow> for (String, Version) {
    type Error = Error;
    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        Ok((row.id, decode_version(row.version)?))
    }
}

/// Storable versions, as Unix nanoseconds in an `i64`.
const VERSION_RANGE: &str = "versions must fall between 1677-09-21 and 2262-04-11 UTC";

/// Versions are stored as Unix nanoseconds so that equality survives the
/// round trip; seconds would collapse two edits made within the same second.
///
/// A version outside [`VERSION_RANGE`] cannot be stored: writing that page
/// fails on every pass until the provider reports a storable timestamp.
pub(crate) fn encode_version(version: Version) -> Result<i64, Error> {
    i64::try_from(version.unix_timestamp_nanos()).or_raise(|| ErrorKind::InvalidData(VERSION_RANGE))
}

pub(crate) fn decode_version(nanos: i64) -> Result<Version, Error> {
    Version::from_unix_timestamp_nanos(i128::from(nanos)).or_raise(|| ErrorKind::InvalidData(VERSION_RANGE))
}
