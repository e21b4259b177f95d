use crate::config::VIDEO_EXTENSIONS;

/// How an asset is warmed: full image fetch or video metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    /// Classify by file extension. Query strings and fragments are ignored.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let ext = match path.rsplit_once('.') {
            Some((_, ext)) if !ext.contains('/') => ext,
            _ => return AssetKind::Image,
        };
        if VIDEO_EXTENSIONS
            .iter()
            .any(|video| ext.eq_ignore_ascii_case(video))
        {
            AssetKind::Video
        } else {
            AssetKind::Image
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub url: String,
    pub kind: AssetKind,
}

impl AssetDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = AssetKind::from_url(&url);
        Self { url, kind }
    }
}

/// Build descriptors in list order. Duplicates are kept.
pub fn descriptors<I, S>(urls: I) -> Vec<AssetDescriptor>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    urls.into_iter().map(AssetDescriptor::new).collect()
}
