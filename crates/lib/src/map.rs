use std::fmt::Write;

use lazy_static::lazy_static;
use serde::Serialize;
use url::Url;

use crate::Office;

pub const DEFAULT_ZOOM: u8 = 13;

lazy_static! {
    static ref MAP_SEARCH_URL: Url = Url::parse("https://www.google.com/maps/search/").unwrap();
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLon,
    /// Hover text: the office name.
    pub title: String,
    pub popup: String,
    pub color: &'static str,
    pub icon: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PolyLine {
    pub points: Vec<LatLon>,
    pub color: &'static str,
}

/// A renderable map of one office and, for sub-offices, the link to its
/// parent.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OfficeMap {
    pub center: LatLon,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub lines: Vec<PolyLine>,
}

impl From<&Office> for LatLon {
    fn from(office: &Office) -> Self {
        LatLon {
            latitude: office.latitude,
            longitude: office.longitude,
        }
    }
}

fn office_marker(office: &Office, color: &'static str) -> Marker {
    Marker {
        position: office.into(),
        title: office.name.clone(),
        popup: format!(
            "{} ({}, {})",
            office.name, office.latitude, office.longitude
        ),
        color,
        icon: "building",
    }
}

/// Builds the map for `office`. A connecting line is drawn only when the
/// office is a sub-office and its parent was resolved by the caller.
pub fn render(office: &Office, parent: Option<&Office>) -> OfficeMap {
    let mut markers = vec![office_marker(office, "blue")];
    let mut lines = Vec::new();

    if let (true, Some(parent)) = (office.is_sub_office, parent) {
        markers.push(office_marker(parent, "gray"));
        lines.push(PolyLine {
            points: vec![office.into(), parent.into()],
            color: "green",
        });
    }

    OfficeMap {
        center: office.into(),
        zoom: DEFAULT_ZOOM,
        markers,
        lines,
    }
}

/// External map-search link for the given coordinates.
pub fn search_url(latitude: f64, longitude: f64) -> Url {
    let mut url = MAP_SEARCH_URL.clone();
    url.set_query(Some(&format!("api=1&query={},{}", latitude, longitude)));
    url
}

/// Leaflet inserts popup content as HTML.
fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn js_string(value: &str) -> String {
    // serde_json string literals are valid JS; keep "</script>" out of the page.
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

impl OfficeMap {
    /// Self-contained Leaflet page showing the markers and lines.
    pub fn to_html(&self) -> String {
        let mut script = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            script,
            "var map = L.map('map').setView([{}, {}], {});",
            self.center.latitude, self.center.longitude, self.zoom
        );
        let _ = writeln!(
            script,
            "L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', \
             {{ maxZoom: 19, attribution: '&copy; OpenStreetMap contributors' }}).addTo(map);"
        );

        for marker in &self.markers {
            let icon_html = format!(
                "<i class=\"fa fa-{}\" style=\"color: {}; font-size: 24px\"></i>",
                html_escape(marker.icon),
                html_escape(marker.color)
            );
            let _ = writeln!(
                script,
                "L.marker([{}, {}], {{ title: {}, icon: L.divIcon({{ className: {}, html: {} }}) }})\
                 .bindPopup({}).addTo(map);",
                marker.position.latitude,
                marker.position.longitude,
                js_string(&marker.title),
                js_string("office-marker"),
                js_string(&icon_html),
                js_string(&html_escape(&marker.popup))
            );
        }

        for line in &self.lines {
            let points = line
                .points
                .iter()
                .map(|p| format!("[{}, {}]", p.latitude, p.longitude))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                script,
                "L.polyline([{}], {{ color: {} }}).addTo(map);",
                points,
                js_string(line.color)
            );
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>#map {{ height: 500px; }}</style>
</head>
<body>
<div id="map"></div>
<script>
{}</script>
</body>
</html>
"#,
            script
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OfficeDraft, OfficeId};

    fn office(name: &str, lat: f64, lon: f64, parent: Option<OfficeId>) -> Office {
        Office::from_draft(OfficeDraft {
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            is_sub_office: parent.is_some(),
            parent_office: parent,
        })
    }

    #[test]
    fn sub_office_gets_exactly_one_line_to_parent() {
        let hq = office("HQ", 48.85, 2.35, None);
        let annex = office("Annex", 48.9, 2.3, Some(hq.id));

        let map = render(&annex, Some(&hq));

        assert_eq!(map.lines.len(), 1);
        assert_eq!(
            map.lines[0].points,
            vec![
                LatLon { latitude: 48.9, longitude: 2.3 },
                LatLon { latitude: 48.85, longitude: 2.35 },
            ]
        );
        assert_eq!(map.center, LatLon { latitude: 48.9, longitude: 2.3 });
        assert_eq!(map.markers[0].popup, "Annex (48.9, 2.3)");
    }

    #[test]
    fn root_office_has_no_lines() {
        let hq = office("HQ", 48.85, 2.35, None);
        let other = office("Other", 1.0, 1.0, None);

        assert!(render(&hq, None).lines.is_empty());
        assert!(render(&hq, Some(&other)).lines.is_empty());
        assert_eq!(render(&hq, None).markers.len(), 1);
        assert_eq!(render(&hq, None).zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn unresolved_parent_draws_no_line() {
        let annex = office("Annex", 48.9, 2.3, Some(OfficeId::generate()));
        assert!(render(&annex, None).lines.is_empty());
    }

    #[test]
    fn html_contains_markers_and_lines() {
        let hq = office("HQ", 48.85, 2.35, None);
        let annex = office("Annex </script>", 48.9, 2.3, Some(hq.id));

        let html = render(&annex, Some(&hq)).to_html();
        assert_eq!(html.matches("L.polyline(").count(), 1);
        assert_eq!(html.matches("L.marker(").count(), 2);
        assert!(html.contains("setView([48.9, 2.3], 13)"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn popup_markup_is_escaped() {
        let office = office("<img src=x onerror=alert(1)>", 1.0, 2.0, None);

        let html = render(&office, None).to_html();
        assert!(!html.contains(".bindPopup(\"<img"));
        assert!(html.contains(".bindPopup(\"&lt;img src=x onerror=alert(1)&gt; (1, 2)\")"));
    }

    #[test]
    fn markers_carry_their_colour_and_office_name() {
        let hq = office("HQ", 48.85, 2.35, None);
        let annex = office("Annex", 48.9, 2.3, Some(hq.id));

        let html = render(&annex, Some(&hq)).to_html();
        assert!(html.contains("title: \"Annex\""));
        assert!(html.contains("title: \"HQ\""));
        assert!(html.contains("color: blue"));
        assert!(html.contains("color: gray"));
        assert!(html.contains("fa-building"));
    }

    #[test]
    fn search_url_embeds_coordinates() {
        assert_eq!(
            search_url(48.85, -2.35).as_str(),
            "https://www.google.com/maps/search/?api=1&query=48.85,-2.35"
        );
    }
}
