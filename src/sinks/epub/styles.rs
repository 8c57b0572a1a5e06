//! CSS for e-readers.
//!
//! Kindle devices honour a limited subset of CSS, so the stylesheet sticks to
//! fonts, margins, borders and page-break hints. The same rules double as the base
//! reading styles of the single-page HTML master volume.

/// Generate the stylesheet embedded in every EPUB.
pub fn generate_stylesheet() -> String {
    let mut css = String::with_capacity(4096);
    css.push_str(reading_styles());
    css.push_str(EPUB_ONLY);
    css
}

/// Typography shared by EPUB chapters and the HTML master volume.
pub fn reading_styles() -> &'static str {
    READING
}

const READING: &str = r#"
/* Base styles */
body {
    font-family: "Bookerly", "Times New Roman", serif;
    font-size: 1em;
    line-height: 1.6;
    text-align: justify;
}

h1, h2, h3, h4, h5, h6 {
    font-family: "Amazon Ember", "Helvetica Neue", sans-serif;
    font-weight: bold;
    color: #000;
    page-break-after: avoid;
    margin-top: 1.5em;
    margin-bottom: 0.5em;
    text-align: left;
}

h1 { font-size: 1.8em; text-align: center; }
h2 { font-size: 1.5em; }
h3 { font-size: 1.3em; color: #555; }
h4 { font-size: 1.1em; color: #666; }
h5, h6 { font-size: 1em; color: #777; }

p { margin: 1em 0; }

code {
    font-family: "Courier New", monospace;
    font-size: 0.9em;
}

pre {
    border: 1px solid #ddd;
    padding: 0.5em;
    white-space: pre-wrap;
    page-break-inside: avoid;
    text-align: left;
}

blockquote {
    border-left: 4px solid #ccc;
    margin: 1em 0;
    padding-left: 1em;
    font-style: italic;
}

ul, ol { margin: 1em 0; padding-left: 2em; }
li { margin: 0.3em 0; }

table { border-collapse: collapse; width: 100%; margin: 1em 0; }
th, td { border: 1px solid #ddd; padding: 4px 8px; text-align: left; vertical-align: top; }
th { font-weight: bold; }

hr { border: none; border-top: 1px solid #ccc; margin: 2em 0; }
"#;

const EPUB_ONLY: &str = r#"
body { margin: 1em; }

/* Chapter boundaries */
.chapter { page-break-before: always; }

/* Table of contents */
.toc ol { list-style-type: none; padding-left: 1em; }
.toc li { margin: 0.3em 0; }
.toc a { text-decoration: none; color: inherit; }
.toc .chapter-entry { font-weight: bold; }

/* Cover page */
.cover { text-align: center; padding: 2em 1em; }
.cover p { text-align: center; }
.cover img { max-width: 80%; max-height: 50vh; margin: 1em auto; }

@media amzn-kf8 {
    body { font-size: 1em; line-height: 1.6; }
}
"#;
