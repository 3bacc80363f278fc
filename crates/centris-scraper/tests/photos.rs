use centris_scraper::{extract_photos, MAX_PHOTOS};
use scraper::Html;

fn page(script: &str) -> Html {
    Html::parse_document(&format!(
        "<html><head><script>{script}</script></head><body></body></html>"
    ))
}

#[test]
fn padded_to_fixed_slots() {
    let photos = extract_photos(&page(r#"MosaicPhotoUrls = ["a.jpg","b.jpg"];"#));

    let columns = photos.columns().collect::<Vec<_>>();
    assert_eq!(MAX_PHOTOS, columns.len());
    assert_eq!(("photo_1".to_string(), Some("a.jpg")), columns[0]);
    assert_eq!(("photo_2".to_string(), Some("b.jpg")), columns[1]);
    assert!(columns[2..].iter().all(|(_, url)| url.is_none()));
    assert_eq!("photo_35", columns[34].0);
}

#[test]
fn payload_without_semicolon() {
    let photos = extract_photos(&page(r#"MosaicPhotoUrls = ["a.jpg","b.jpg"]"#));

    assert_eq!(Some("a.jpg"), photos.get(0));
    assert_eq!(Some("b.jpg"), photos.get(1));
    assert!((2..MAX_PHOTOS).all(|slot| photos.get(slot).is_none()));
    assert_eq!(2, photos.count());
}

#[test]
fn truncated_to_fixed_slots() {
    let urls = (1..=40)
        .map(|i| format!("\"{i}.jpg\""))
        .collect::<Vec<_>>()
        .join(",");
    let photos = extract_photos(&page(&format!("var MosaicPhotoUrls=[{urls}];")));

    assert_eq!(MAX_PHOTOS, photos.count());
    assert_eq!(Some("1.jpg"), photos.get(0));
    assert_eq!(Some("35.jpg"), photos.get(34));
}

#[test]
fn missing_or_malformed_payload() {
    for script in [
        "var dataLayer = [];",
        "MosaicPhotoUrls = ['a.jpg', 'b.jpg'];",
        "MosaicPhotoUrls = [\"a.jpg\",",
    ] {
        let photos = extract_photos(&page(script));
        assert_eq!(0, photos.count(), "{script}");
        assert_eq!(MAX_PHOTOS, photos.columns().count());
    }
}

#[test]
fn first_script_with_payload() {
    let html = Html::parse_document(
        r#"<script>var x = 1;</script>
        <script>MosaicPhotoUrls = ["first.jpg"];</script>
        <script>MosaicPhotoUrls = ["second.jpg"];</script>"#,
    );

    assert_eq!(Some("first.jpg"), extract_photos(&html).get(0));
}
