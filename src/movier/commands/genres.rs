use crate::catalog::GENRES;
use crate::commands::{CmdMessage, CmdResult};

pub fn run() -> CmdResult {
    let mut result = CmdResult {
        genres: GENRES.iter().map(|g| g.to_string()).collect(),
        ..Default::default()
    };
    result.add_message(CmdMessage::info("Listing all IMDb genres"));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_genres() {
        let result = run();
        assert_eq!(result.genres.len(), 26);
        assert_eq!(result.genres.first().map(String::as_str), Some("Action"));
        assert!(result.genres.contains(&"Film-Noir".to_string()));
    }
}
