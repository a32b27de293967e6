use serde::{Deserialize, Serialize};

/// Server-side identifier of a track.
pub type TrackId = i64;

/// A playable audio item as the catalog backend describes it.
///
/// Field names on the wire follow the backend (`imagePath`, `playlistName`,
/// `file_Path`); unknown fields are ignored when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub author: String,
    /// Length in seconds.
    pub duration: u32,
    #[serde(rename = "imagePath", default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub downloaded: bool,
    #[serde(default)]
    pub favorite: bool,
    #[serde(rename = "playlistName", default)]
    pub playlist_name: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    /// Local path or http(s) URL of the audio data.
    #[serde(rename = "file_Path", default)]
    pub file_path: Option<String>,
}

impl Track {
    /// A bare track with only the required metadata set.
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        author: impl Into<String>,
        duration: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            duration,
            image_path: None,
            downloaded: false,
            favorite: false,
            playlist_name: None,
            genre: None,
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Duration as `m:ss`.
    pub fn formatted_duration(&self) -> String {
        format!("{}:{:02}", self.duration / 60, self.duration % 60)
    }

    /// `author - title`, or just the title when the author is blank.
    pub fn display(&self) -> String {
        match self.author.trim() {
            "" => self.title.clone(),
            a => format!("{} - {}", a, self.title),
        }
    }

    pub fn toggle_favorite(&mut self) {
        self.favorite = !self.favorite;
    }

    pub fn toggle_downloaded(&mut self) {
        self.downloaded = !self.downloaded;
    }

    /// Copy of this track with `favorite` flipped.
    pub fn with_favorite_toggled(&self) -> Self {
        let mut t = self.clone();
        t.toggle_favorite();
        t
    }

    /// Copy of this track with `downloaded` flipped.
    pub fn with_downloaded_toggled(&self) -> Self {
        let mut t = self.clone();
        t.toggle_downloaded();
        t
    }

    /// True when `file_path` points at an http(s) resource.
    pub fn is_remote(&self) -> bool {
        self.file_path.as_deref().map(is_http_url).unwrap_or(false)
    }
}

pub(crate) fn is_http_url(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with("http://") || s.starts_with("https://")
}
