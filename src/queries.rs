//! The fixed analytical queries this tool exists to run.

/// Denormalize every track with its album, artist, audio features and
/// popularity into one wide result set.
pub const TRACKS_JOIN_SQL: &str = "\
SELECT *
  FROM tracks_table t
  JOIN albums_table a ON t.album_id = a.album_id
  JOIN artists_table ar ON a.artist_id = ar.artist_id
  JOIN tracks_features_table tf ON t.track_id = tf.track_id
  JOIN tracks_popularity_table tp ON t.track_id = tp.track_id;";

/// Row count of [`TRACKS_JOIN_SQL`], for verifying a loaded table against an
/// independent count.
pub const TRACKS_JOIN_COUNT_SQL: &str = "\
SELECT COUNT(*) AS row_count
  FROM tracks_table t
  JOIN albums_table a ON t.album_id = a.album_id
  JOIN artists_table ar ON a.artist_id = ar.artist_id
  JOIN tracks_features_table tf ON t.track_id = tf.track_id
  JOIN tracks_popularity_table tp ON t.track_id = tp.track_id;";
