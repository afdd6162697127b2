mod audio;
mod history;
mod ids;
mod playlist;
mod song;
mod stats;
mod user;

pub use audio::AudioFormat;
pub use history::HistoryEntry;
pub use ids::{PlaylistId, SongId, UserId};
pub use playlist::{CreatePlaylist, Playlist, PlaylistSong};
pub use song::{CreateSong, FavoriteState, Song, SongScope, SongTags, UNKNOWN_ARTIST};
pub use stats::{GlobalStats, TopSong};
pub use user::{CreateUser, Identity, User, UserSummary};
