use gleaner_core::ExtractConfig;
use gleaner_engine::{BoilerplateStripper, TextExtractor};
use pretty_assertions::assert_eq;

const PAGE: &str = r#"<!doctype html>
<html>
<head><title>Budget</title><script>var tracking = 1;</script><style>p { color: red }</style></head>
<body>
  <header><a href="/">Home</a></header>
  <nav><ul><li>Politics</li><li>Sports</li></ul></nav>
  <div class="ad-slot">Buy now</div>
  <div id="sidebar-left">Trending</div>
  <div class="paywall-banner">Subscribe today</div>
  <article>
    <h1>City passes   budget</h1>
    <p>The council voted
       on Tuesday.</p>
    <iframe src="https://video.example"></iframe>
  </article>
  <aside>Related stories</aside>
  <footer>Copyright</footer>
</body>
</html>"#;

#[test]
fn strips_structural_and_ad_markup() {
    let text = BoilerplateStripper::default().extract_text(PAGE);
    assert_eq!(text, "Budget City passes budget The council voted on Tuesday.");
}

#[test]
fn extraction_is_idempotent() {
    let stripper = BoilerplateStripper::default();
    let once = stripper.extract_text(PAGE);
    let twice = stripper.extract_text(&once);
    assert_eq!(once, twice);
}

#[test]
fn extraction_is_idempotent_with_escaped_markup() {
    let stripper = BoilerplateStripper::default();
    let html = "<body><p>Wrap menus in a &lt;nav&gt;site menu&lt;/nav&gt; element; \
                use &amp;lt; for less-than.</p></body>";

    let once = stripper.extract_text(html);
    assert_eq!(
        once,
        "Wrap menus in a <nav>site menu</nav> element; use &lt; for less-than."
    );
    assert_eq!(stripper.extract_text(&once), once);
}

#[test]
fn entities_in_plain_text_are_not_decoded_again() {
    let stripper = BoilerplateStripper::default();
    let once = stripper.extract_text("<p>Fish &amp;amp; chips</p>");
    assert_eq!(once, "Fish &amp; chips");
    assert_eq!(stripper.extract_text(&once), "Fish &amp; chips");
}

#[test]
fn plain_text_passes_through_trimmed() {
    let text = BoilerplateStripper::default().extract_text("  just   some\n\ttext  ");
    assert_eq!(text, "just some text");
}

#[test]
fn patterns_match_case_insensitively() {
    let html = r#"<body><div class="Top AD-unit">x</div><p id="PAYWALL-note">y</p><p>kept</p></body>"#;
    assert_eq!(BoilerplateStripper::default().extract_text(html), "kept");
}

#[test]
fn config_controls_what_is_removed() {
    let config = ExtractConfig {
        removed_tags: vec!["h1".to_string()],
        class_patterns: Vec::new(),
        id_patterns: Vec::new(),
    };
    let html = "<body><h1>Title</h1><nav>Menu</nav><p>Body</p></body>";
    assert_eq!(BoilerplateStripper::new(&config).extract_text(html), "Menu Body");
}

#[test]
fn comments_are_not_text() {
    let html = "<body><!-- hidden --><p>shown</p></body>";
    assert_eq!(BoilerplateStripper::default().extract_text(html), "shown");
}
