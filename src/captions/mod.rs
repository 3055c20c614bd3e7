pub mod decoder;
pub mod fetch;
pub mod panel;
pub mod tracks;

pub use decoder::{decode_captions, decode_json, decode_xml};
pub use fetch::{
    fetch_transcript, strip_format, with_json_format, CaptionFetcher, HttpCaptionFetcher,
};
pub use panel::{parse_cue_groups, parse_initial_data, parse_panel_text, parse_search_panel};
pub use tracks::{parse_player_response, select_caption_track, CaptionTrack, PlayerData};
