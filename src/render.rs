//! Renders a post's static HTML page from the fixed [`PAGE_TEMPLATE`].

use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;

/// The document every post page is rendered from. Values are substituted
/// verbatim; `content` is expected to already be HTML.
pub const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{.title}} - Abundant Coaches Hub</title>
    <!-- Tailwind CSS -->
    <script src="https://cdn.tailwindcss.com"></script>
    <!-- Google Fonts: Inter -->
    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700;800;900&display=swap" rel="stylesheet">
    <style>
        body {
            font-family: 'Inter', sans-serif;
        }
    </style>
</head>
<body class="bg-gray-50">
    <header class="bg-white shadow-sm">
        <nav class="container mx-auto px-6 py-4">
            <div class="text-2xl font-bold text-gray-900"><a href="../index.html">Abundant Coaches Hub</a></div>
        </nav>
    </header>

    <main class="container mx-auto px-6 py-12 max-w-3xl">
        <article>
            <h1 class="text-4xl font-extrabold text-gray-900">{{.title}}</h1>
            <p class="text-lg text-gray-500 mt-2">{{.date}} • {{.category}}</p>

            <img class="w-full h-auto rounded-lg my-8 shadow-lg" src="{{.image}}" alt="{{.title}}">

            <div class="prose lg:prose-xl text-gray-700">
                {{.content}}
            </div>
        </article>
    </main>

    <footer class="bg-white text-gray-700 mt-16">
        <div class="container mx-auto px-6 py-8 text-center">
            <p>© 2025 Abundant Coaches Hub. All Rights Reserved.</p>
        </div>
    </footer>
</body>
</html>
"#;

/// Renders the page for a post. This touches nothing on disk, so the output
/// depends only on its arguments.
pub fn render(
    title: &str,
    date: &str,
    category: &str,
    image: &str,
    content: &str,
) -> Result<String> {
    let mut template = Template::default();
    template.parse(PAGE_TEMPLATE).map_err(Error::Parse)?;

    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("title".to_owned(), Value::String(title.to_owned()));
    m.insert("date".to_owned(), Value::String(date.to_owned()));
    m.insert("category".to_owned(), Value::String(category.to_owned()));
    m.insert("image".to_owned(), Value::String(image.to_owned()));
    m.insert("content".to_owned(), Value::String(content.to_owned()));

    let mut out: Vec<u8> = Vec::new();
    template
        .execute(
            &mut out,
            &Context::from(Value::Object(m)).map_err(Error::Execute)?,
        )
        .map_err(Error::Execute)?;
    String::from_utf8(out).map_err(Error::Utf8)
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a page.
#[derive(Debug)]
pub enum Error {
    /// The page template didn't parse.
    Parse(String),

    /// Executing the template against the post's values failed.
    Execute(String),

    /// The rendered output wasn't valid UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "Parsing page template: {}", err),
            Error::Execute(err) => write!(f, "Executing page template: {}", err),
            Error::Utf8(err) => write!(f, "Rendered page: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(_) => None,
            Error::Execute(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}
