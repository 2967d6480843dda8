//! Server banner: a single optional `banner/banner.png` under the content
//! root. No descriptor, no list, just an asset reference or nothing.

use crate::compile::{Context, Kind};
use crate::error::Result;
use fermata_repository::AssetReference;

pub(crate) fn compile(ctx: &Context) -> Result<Option<AssetReference>> {
    let banner = ctx.optional_asset(&ctx.kind_dir(Kind::Banner), "banner.png")?;
    if banner.is_none() {
        tracing::debug!("no banner shipped");
    }
    Ok(banner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::testutil;
    use fermata_config::FailurePolicy;
    use std::fs;

    #[test]
    fn absent_banner_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = testutil::context(dir.path(), FailurePolicy::Skip);
        assert!(compile(&ctx).unwrap().is_none());
    }

    #[test]
    fn present_banner_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = testutil::context(dir.path(), FailurePolicy::Skip);
        fs::create_dir_all(dir.path().join("banner")).unwrap();
        fs::write(dir.path().join("banner/banner.png"), b"png bytes").unwrap();
        let banner = compile(&ctx).unwrap().unwrap();
        assert!(banner.url.ends_with(banner.hash.as_str()));
    }
}
