#![allow(dead_code)]

pub const SONG_1_ID: &str = "SOUPIRU12A6D4FA1E1";
pub const SONG_1_TITLE: &str = "Der Kleine Dompfaff";
pub const SONG_1_DURATION: f64 = 152.92036;
pub const ARTIST_1_ID: &str = "ARJIE2Y1187B994AB7";
pub const ARTIST_1_NAME: &str = "Line Renaud";

pub const SONG_2_ID: &str = "SOZCTXZ12AB0182364";
pub const SONG_2_TITLE: &str = "Setanta matins";
pub const SONG_2_DURATION: f64 = 269.58322;
pub const ARTIST_2_ID: &str = "AR5KOSW1187FB35FF4";
pub const ARTIST_2_NAME: &str = "Elena";

pub const USER_ID: &str = "26";
pub const SESSION_ID: i64 = 583;

/// 2018-11-15 00:30:26.796 UTC
pub const TS_1: i64 = 1542241826796;
/// 2018-11-15 00:41:21.796 UTC
pub const TS_2: i64 = 1542242481796;
/// 2018-11-15 00:45:41.796 UTC
pub const TS_3: i64 = 1542242741796;
