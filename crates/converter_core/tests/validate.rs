use converter_core::is_valid_url;

#[test]
fn accepts_every_supported_shape() {
    let accepted = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "http://youtube.com/watch?v=dQw4w9WgXcQ",
        "https://www.youtube.com/shorts/abc_DEF-123",
        "https://youtube.com/shorts/abc",
        "https://youtu.be/dQw4w9WgXcQ",
        "http://youtu.be/x",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
        "https://youtube.com/embed/dQw4w9WgXcQ",
        "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
    ];
    for url in accepted {
        assert!(is_valid_url(url), "expected {url} to be accepted");
    }
}

#[test]
fn allows_trailing_parameters_and_surrounding_whitespace() {
    assert!(is_valid_url(
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123&t=42s"
    ));
    assert!(is_valid_url("https://youtu.be/dQw4w9WgXcQ?si=tracking"));
    assert!(is_valid_url("   https://youtu.be/dQw4w9WgXcQ \n"));
}

#[test]
fn rejects_empty_and_foreign_input() {
    let rejected = [
        "",
        "   ",
        "not a url",
        "https://vimeo.com/12345",
        "https://www.youtube.com/",
        "https://www.youtube.com/watch?v=",
        "https://www.youtube.com/watch?list=PL123",
        "https://youtu.be/",
        "ftp://youtu.be/dQw4w9WgXcQ",
        "https://m.youtube.com/shorts/abc",
        "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://www.youtube.com/shorts/?x",
        "youtube.com/watch?v=dQw4w9WgXcQ",
        "see https://youtu.be/dQw4w9WgXcQ",
    ];
    for url in rejected {
        assert!(!is_valid_url(url), "expected {url:?} to be rejected");
    }
}
