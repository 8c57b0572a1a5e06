//! Stylesheets embedded in the generated HTML pages.

/// Reading styles for documents rendered from markdown, tuned for printing.
pub const DOCUMENT: &str = r#"
body {
    font-family: Georgia, "Times New Roman", serif;
    line-height: 1.6;
    color: #222;
    max-width: 900px;
    margin: 0 auto;
    padding: 2em;
}

h1, h2, h3, h4, h5, h6 {
    font-family: "Helvetica Neue", Arial, sans-serif;
    line-height: 1.25;
    page-break-after: avoid;
}

h1 { font-size: 2em; border-bottom: 2px solid #333; padding-bottom: 0.3em; }
h2 { font-size: 1.5em; border-bottom: 1px solid #ccc; padding-bottom: 0.2em; }
h3 { font-size: 1.25em; }

code {
    font-family: "SFMono-Regular", Consolas, "Liberation Mono", monospace;
    background-color: #f5f5f5;
    padding: 2px 4px;
    border-radius: 3px;
    font-size: 0.9em;
}

pre {
    background-color: #f8f8f8;
    border: 1px solid #ddd;
    border-radius: 5px;
    padding: 1em;
    overflow-x: auto;
    page-break-inside: avoid;
}

pre code { background: none; padding: 0; }

blockquote {
    border-left: 4px solid #ccc;
    margin: 1em 0;
    padding-left: 1em;
    color: #666;
}

table { border-collapse: collapse; width: 100%; margin: 1em 0; page-break-inside: avoid; }
th, td { border: 1px solid #ddd; padding: 8px 12px; text-align: left; vertical-align: top; }
th { background-color: #f2f2f2; }

.toc {
    background-color: #f9f9f9;
    border: 1px solid #ddd;
    border-radius: 5px;
    padding: 1em 2em;
    margin-bottom: 2em;
}

.toc ul { list-style-type: none; padding-left: 1.2em; }
.toc a { text-decoration: none; color: #0366d6; }

.page-break { page-break-before: always; }

.document-header { text-align: center; margin-bottom: 2em; }
.document-title { border-bottom: none; }
.document-date { color: #777; font-style: italic; }

.footer {
    margin-top: 3em;
    padding-top: 1em;
    border-top: 1px solid #ccc;
    color: #777;
    font-size: 0.9em;
    text-align: center;
}

@media print {
    body { font-size: 12pt; max-width: none; padding: 0; }
    a { color: #000; text-decoration: none; }
    .toc { page-break-after: always; }
}
"#;

/// Extra rules for the single-page master volume.
pub const VOLUME: &str = r#"
.author { text-align: center; font-style: italic; color: #555; }
#title { text-align: center; border-bottom: none; }
.chapter > h2:first-child { margin-top: 3em; padding-top: 1em; }
.toc-link { display: block; margin-top: 1.5em; font-size: 0.9em; }
"#;

/// Card grid used by the index pages.
pub const INDEX: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
    color: #333;
    background: #f4f6f8;
    margin: 0;
    padding: 2em;
}

.header { text-align: center; margin-bottom: 2em; }
.header .subtitle { color: #666; }
.summary { text-align: center; margin-bottom: 2em; }

.grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(320px, 1fr));
    gap: 1.5em;
}

.card {
    background: #fff;
    border: 1px solid #e1e4e8;
    border-radius: 8px;
    padding: 1.2em 1.5em;
}

.card h3 { margin-top: 0; }
.card h3 a { color: #0366d6; text-decoration: none; }
.card .details { font-size: 0.85em; color: #666; }
.card .details span { margin-right: 1em; }
.card .preview { font-size: 0.9em; color: #444; }

.footer { text-align: center; color: #888; margin-top: 3em; font-size: 0.9em; }
"#;

/// Diagram pages (Mermaid and ASCII art).
pub const DIAGRAM: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
    color: #333;
    background: #f4f6f8;
    margin: 0;
    padding: 2em;
}

.container { max-width: 1400px; margin: 0 auto; background: #fff; border-radius: 8px; }
.header { padding: 1.5em 2em; border-bottom: 1px solid #e9ecef; text-align: center; }
.header .source { font-size: 0.9em; color: #888; font-style: italic; }
.content { padding: 2em; }
.navigation { margin-bottom: 1.5em; text-align: center; }
.navigation a { color: #0366d6; }

.diagram-container {
    margin-bottom: 2.5em;
    padding: 1.5em;
    background: #f8f9fa;
    border: 1px solid #e9ecef;
    border-radius: 8px;
    overflow-x: auto;
}

.mermaid { text-align: center; }
.mermaid svg { max-width: 100%; height: auto; }

figure.ascii-art { margin: 0; }
figure.ascii-art pre {
    font-family: "DejaVu Sans Mono", Menlo, Consolas, monospace;
    font-size: 13px;
    line-height: 1.2;
    white-space: pre;
    margin: 0;
}
figure.ascii-art figcaption { margin-top: 1em; text-align: center; font-style: italic; color: #555; }

.footer { padding: 1em 2em; text-align: center; color: #888; border-top: 1px solid #e9ecef; }

@media print {
    body { background: #fff; padding: 0; }
    .navigation { display: none; }
    .diagram-container { page-break-inside: avoid; }
}
"#;
