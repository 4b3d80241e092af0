//! Outbound lookup links derived from plan fields.

use urlencoding::encode;

use crate::edit::FALLBACK_LOCATION;

/// Google Maps search link for an activity location.
///
/// A placeholder location queries the destination alone; anything else is
/// qualified with the destination so same-named places resolve sensibly.
#[must_use]
pub fn map_url(location: &str, destination: &str) -> String {
    let query = if location == FALLBACK_LOCATION {
        destination.to_string()
    } else {
        format!("{location}, {destination}")
    };
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        encode(&query)
    )
}

/// Spotify search link for the itinerary's playlist vibe.
#[must_use]
pub fn playlist_search_url(vibe: &str) -> String {
    format!("https://open.spotify.com/search/{}", encode(vibe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_qualified_with_destination() {
        let url = map_url("Fushimi Inari", "Kyoto, Japan");
        assert!(url.starts_with("https://www.google.com/maps/search/?api=1&query="));
        assert!(url.contains("Fushimi%20Inari%2C%20Kyoto%2C%20Japan"));
    }

    #[test]
    fn placeholder_location_queries_destination_alone() {
        let url = map_url("TBD", "Kyoto, Japan");
        assert!(url.ends_with("query=Kyoto%2C%20Japan"));
        assert!(!url.contains("TBD"));
    }

    #[test]
    fn playlist_vibe_is_encoded_into_search_path() {
        let url = playlist_search_url("lo-fi beach sunset");
        assert_eq!(
            url,
            "https://open.spotify.com/search/lo-fi%20beach%20sunset"
        );
    }
}
