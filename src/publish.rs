//! Exports the [`Publisher`] which turns a [`RawInput`] into a published post:
//! a new [`PostRecord`] at the end of the index file and a rendered HTML page
//! in the output folder.

use crate::index;
use crate::post::{self, PostRecord, RawInput};
use crate::render::{self, render};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Publishes posts into an index file and output folder.
pub struct Publisher<'a> {
    /// The JSON index file. It need not exist yet.
    pub index_file: &'a Path,

    /// The folder rendered pages are written to. Created on demand.
    pub output_directory: &'a Path,

    /// The name records use for the output folder when building their `url`,
    /// e.g. `blogposts` for `blogposts/post1.html`.
    pub output_folder: &'a str,
}

/// A successfully published post.
#[derive(Debug)]
pub struct Published {
    pub record: PostRecord,

    /// The rendered page written to disk.
    pub path: PathBuf,
}

impl Publisher<'_> {
    /// Publishes `raw` dated today (local time). See [`Publisher::publish_on`].
    pub fn publish(&self, raw: RawInput) -> Result<Published> {
        self.publish_on(raw, Local::now().naive_local().date())
    }

    /// Validates `raw`, assigns the next id and writes the post's page and
    /// then the updated index.
    ///
    /// Nothing is written if validation fails or the page can't be written.
    /// If the index write fails after the page was written, the page is left
    /// behind without an index entry.
    pub fn publish_on(&self, raw: RawInput, date: NaiveDate) -> Result<Published> {
        let popularity = validate(&raw)?;
        let content = raw.content.trim();

        let mut entries = index::load(self.index_file).map_err(|err| Error::ReadIndex {
            path: self.index_file.to_owned(),
            err,
        })?;
        let id = index::next_id(&entries).ok_or(Error::IdsExhausted)?;
        let record = PostRecord {
            id,
            image: raw.image,
            date: post::format_date(date),
            category: raw.category,
            title: raw.title,
            description: raw.description,
            url: post::post_url(self.output_folder, id),
            popularity,
        };

        let page = render(
            &record.title,
            &record.date,
            &record.category,
            &record.image,
            content,
        )?;
        entries.push(serde_json::to_value(&record).map_err(Error::Serialize)?);
        let encoded = index::encode(&entries).map_err(Error::Serialize)?;

        if !self.output_directory.exists() {
            debug!(path = %self.output_directory.display(), "creating output folder");
        }
        std::fs::create_dir_all(self.output_directory).map_err(|err| {
            Error::CreateDirectory {
                path: self.output_directory.to_owned(),
                err,
            }
        })?;

        let path = self.output_directory.join(post::file_name(id));
        std::fs::write(&path, page).map_err(|err| Error::WriteHtml {
            path: path.clone(),
            err,
        })?;
        std::fs::write(self.index_file, encoded).map_err(|err| Error::WriteIndex {
            path: self.index_file.to_owned(),
            err,
        })?;

        info!(id = record.id, path = %path.display(), "published post");
        Ok(Published { record, path })
    }
}

/// Checks the required fields in order and returns the parsed popularity.
fn validate(raw: &RawInput) -> std::result::Result<i64, ValidationError> {
    let content = raw.content.trim();
    for (field, value) in [
        (Field::Title, raw.title.as_str()),
        (Field::Category, raw.category.as_str()),
        (Field::Description, raw.description.as_str()),
        (Field::Content, content),
    ]
    .iter()
    {
        if value.is_empty() {
            return Err(ValidationError::MissingField(*field));
        }
    }

    match raw.popularity.trim().parse::<i64>() {
        Ok(popularity) => Ok(popularity),
        Err(_) => Err(ValidationError::PopularityNotNumeric(
            raw.popularity.clone(),
        )),
    }
}

/// A required form field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Field {
    Title,
    Category,
    Description,
    Content,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Field::Title => "title",
            Field::Category => "category",
            Field::Description => "description",
            Field::Content => "content",
        })
    }
}

/// Represents invalid form input. Nothing has been written when one of these
/// is returned.
#[derive(Debug, PartialEq)]
pub enum ValidationError {
    /// A required field was empty (or, for content, only whitespace).
    MissingField(Field),

    /// Popularity didn't parse as an integer. Holds the offending text.
    PopularityNotNumeric(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => {
                write!(f, "missing required field: {}", field)
            }
            ValidationError::PopularityNotNumeric(value) => {
                write!(f, "popularity not numeric: {:?}", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// The result of a fallible publishing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for publishing a post. Only [`Error::WriteIndex`] can leave
/// anything behind on disk (the orphaned page).
#[derive(Debug)]
pub enum Error {
    /// Returned when the form input is invalid.
    Validation(ValidationError),

    /// Returned when the index file exists but couldn't be read.
    ReadIndex { path: PathBuf, err: io::Error },

    /// Returned when the largest id in the index is already `u64::MAX`, so
    /// no new id can be assigned.
    IdsExhausted,

    /// Returned when the page template fails.
    Render(render::Error),

    /// Returned when the updated index can't be encoded as JSON.
    Serialize(serde_json::Error),

    /// Returned when the output folder can't be created.
    CreateDirectory { path: PathBuf, err: io::Error },

    /// Returned when the page can't be written. The index is untouched.
    WriteHtml { path: PathBuf, err: io::Error },

    /// Returned when the index can't be written. The page was already
    /// written and is now orphaned.
    WriteIndex { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Validation(err) => err.fmt(f),
            Error::ReadIndex { path, err } => {
                write!(f, "Reading index file '{}': {}", path.display(), err)
            }
            Error::IdsExhausted => write!(f, "No post ids left to assign"),
            Error::Render(err) => err.fmt(f),
            Error::Serialize(err) => write!(f, "Encoding index: {}", err),
            Error::CreateDirectory { path, err } => {
                write!(f, "Creating output folder '{}': {}", path.display(), err)
            }
            Error::WriteHtml { path, err } => {
                write!(f, "Writing page '{}': {}", path.display(), err)
            }
            Error::WriteIndex { path, err } => {
                write!(f, "Writing index file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(err) => Some(err),
            Error::ReadIndex { path: _, err } => Some(err),
            Error::IdsExhausted => None,
            Error::Render(err) => Some(err),
            Error::Serialize(err) => Some(err),
            Error::CreateDirectory { path: _, err } => Some(err),
            Error::WriteHtml { path: _, err } => Some(err),
            Error::WriteIndex { path: _, err } => Some(err),
        }
    }
}

impl From<ValidationError> for Error {
    /// Converts [`ValidationError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ValidationError) -> Error {
        Error::Validation(err)
    }
}

impl From<render::Error> for Error {
    /// Converts [`render::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: render::Error) -> Error {
        Error::Render(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn hello() -> RawInput {
        RawInput {
            title: String::from("Hello"),
            category: String::from("News"),
            image: String::new(),
            description: String::from("First post"),
            popularity: String::from("50"),
            content: String::from("<p>Hi</p>"),
        }
    }

    fn june_fifth() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 5).unwrap()
    }

    struct Site {
        dir: TempDir,
        output_directory: PathBuf,
        index_file: PathBuf,
    }

    impl Site {
        fn new() -> io::Result<Site> {
            let dir = TempDir::new()?;
            Ok(Site {
                output_directory: dir.path().join("blogposts"),
                index_file: dir.path().join("posts.json"),
                dir,
            })
        }

        fn publisher(&self) -> Publisher {
            Publisher {
                index_file: &self.index_file,
                output_directory: &self.output_directory,
                output_folder: "blogposts",
            }
        }

        fn entries(&self) -> io::Result<Vec<Value>> {
            index::load(&self.index_file)
        }
    }

    #[test]
    fn test_publish_first_post() -> TestResult {
        let site = Site::new()?;
        let published = site.publisher().publish_on(hello(), june_fifth())?;

        let wanted = PostRecord {
            id: 1,
            image: String::new(),
            date: String::from("June 05, 2025"),
            category: String::from("News"),
            title: String::from("Hello"),
            description: String::from("First post"),
            url: String::from("blogposts/post1.html"),
            popularity: 50,
        };
        assert_eq!(wanted, published.record);
        assert_eq!(site.output_directory.join("post1.html"), published.path);
        assert_eq!(site.dir.path().join(&wanted.url), published.path);

        let page = std::fs::read_to_string(&published.path)?;
        assert!(page.contains(">Hello</h1>"));
        assert!(page.contains("<p>Hi</p>"));
        assert!(page.contains("June 05, 2025 • News"));

        assert_eq!(vec![serde_json::to_value(&wanted)?], site.entries()?);
        Ok(())
    }

    #[test]
    fn test_publish_after_existing_ids() -> TestResult {
        let site = Site::new()?;
        let mut existing = Vec::new();
        for id in &[3, 1, 5] {
            existing.push(PostRecord {
                id: *id,
                image: String::from("x.png"),
                date: String::from("January 01, 2024"),
                category: String::from("Old"),
                title: format!("Old {}", id),
                description: String::from("Older post"),
                url: post::post_url("blogposts", *id),
                popularity: 1,
            });
        }
        let existing = existing
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<Value>>>()?;
        std::fs::write(&site.index_file, index::encode(&existing)?)?;

        let published = site.publisher().publish_on(hello(), june_fifth())?;
        assert_eq!(6, published.record.id);
        assert_eq!("blogposts/post6.html", published.record.url);
        assert!(site.output_directory.join("post6.html").exists());

        let entries = site.entries()?;
        assert_eq!(&existing[..], &entries[..3]);
        assert_eq!(serde_json::to_value(&published.record)?, entries[3]);
        Ok(())
    }

    #[test]
    fn test_publish_replaces_malformed_index() -> TestResult {
        let site = Site::new()?;
        std::fs::write(&site.index_file, "[{\"id\": 4, oops")?;

        let published = site.publisher().publish_on(hello(), june_fifth())?;
        assert_eq!(1, published.record.id);
        assert_eq!(vec![serde_json::to_value(&published.record)?], site.entries()?);
        Ok(())
    }

    #[test]
    fn test_publish_twice() -> TestResult {
        let site = Site::new()?;
        let publisher = site.publisher();
        let first = publisher.publish_on(hello(), june_fifth())?;
        let second = publisher.publish(RawInput {
            title: String::from("Again"),
            ..hello()
        })?;

        assert_eq!(1, first.record.id);
        assert_eq!(2, second.record.id);
        assert!(first.path.exists());
        assert!(second.path.exists());
        assert_eq!(
            vec![
                serde_json::to_value(&first.record)?,
                serde_json::to_value(&second.record)?,
            ],
            site.entries()?
        );
        Ok(())
    }

    #[test]
    fn test_publish_trims_content_only() -> TestResult {
        let site = Site::new()?;
        let published = site.publisher().publish_on(
            RawInput {
                title: String::from(" Spaced "),
                popularity: String::from(" 7 "),
                content: String::from("\n  <p>Hi</p>  \n"),
                ..hello()
            },
            june_fifth(),
        )?;
        assert_eq!(" Spaced ", published.record.title);
        assert_eq!(7, published.record.popularity);
        let page = std::fs::read_to_string(&published.path)?;
        assert!(page.contains("                <p>Hi</p>\n            </div>"));
        Ok(())
    }

    #[test]
    fn test_publish_accepts_out_of_range_popularity() -> TestResult {
        let site = Site::new()?;
        let published = site.publisher().publish_on(
            RawInput {
                popularity: String::from("-250"),
                ..hello()
            },
            june_fifth(),
        )?;
        assert_eq!(-250, published.record.popularity);
        Ok(())
    }

    #[test]
    fn test_publish_keeps_partial_entries() -> TestResult {
        let site = Site::new()?;
        let existing = vec![
            json!({
                "id": 3,
                "image": "",
                "date": "May 01, 2025",
                "category": "Old",
                "title": "No popularity",
                "description": "Written before popularity existed",
                "url": "blogposts/post3.html"
            }),
            json!({
                "id": 7,
                "image": "x.png",
                "date": "May 02, 2025",
                "category": "Old",
                "title": "Older",
                "description": "Another old post",
                "url": "blogposts/post7.html",
                "popularity": 3
            }),
        ];
        std::fs::write(&site.index_file, index::encode(&existing)?)?;

        let published = site.publisher().publish_on(hello(), june_fifth())?;
        assert_eq!(8, published.record.id);

        let entries = site.entries()?;
        assert_eq!(3, entries.len());
        assert_eq!(&existing[..], &entries[..2]);
        assert_eq!(serde_json::to_value(&published.record)?, entries[2]);
        Ok(())
    }

    #[test]
    fn test_publish_keeps_extra_keys() -> TestResult {
        let site = Site::new()?;
        let index = r#"[
  {
    "id": 2,
    "featured": true,
    "image": "",
    "date": "May 01, 2025",
    "category": "Old",
    "title": "Pinned",
    "description": "A featured post",
    "url": "blogposts/post2.html",
    "popularity": 90,
    "tags": [
      "pinned"
    ]
  }
]"#;
        std::fs::write(&site.index_file, index)?;

        site.publisher().publish_on(hello(), june_fifth())?;

        let written = std::fs::read_to_string(&site.index_file)?;
        assert!(written.starts_with(&index[..index.len() - 2]));
        let entries = site.entries()?;
        assert_eq!(Some(&json!(true)), entries[0].get("featured"));
        assert_eq!(Some(&json!(["pinned"])), entries[0].get("tags"));
        assert_eq!(Some(&json!(3)), entries[1].get("id"));
        Ok(())
    }

    #[test]
    fn test_publish_with_exhausted_ids() -> TestResult {
        let site = Site::new()?;
        let index = format!("[{{\"id\": {}}}]", u64::MAX);
        std::fs::write(&site.index_file, &index)?;

        match site.publisher().publish_on(hello(), june_fifth()) {
            Err(Error::IdsExhausted) => (),
            other => panic!("wanted IdsExhausted error, got {:?}", other),
        }
        assert_eq!(index, std::fs::read_to_string(&site.index_file)?);
        assert!(!site.output_directory.exists());
        Ok(())
    }

    #[test]
    fn test_validation_rejects_each_field() -> TestResult {
        let cases = vec![
            (
                RawInput {
                    title: String::new(),
                    ..hello()
                },
                ValidationError::MissingField(Field::Title),
            ),
            (
                RawInput {
                    category: String::new(),
                    ..hello()
                },
                ValidationError::MissingField(Field::Category),
            ),
            (
                RawInput {
                    description: String::new(),
                    ..hello()
                },
                ValidationError::MissingField(Field::Description),
            ),
            (
                RawInput {
                    content: String::from(" \n\t "),
                    ..hello()
                },
                ValidationError::MissingField(Field::Content),
            ),
            (
                RawInput {
                    popularity: String::from("fifty"),
                    ..hello()
                },
                ValidationError::PopularityNotNumeric(String::from("fifty")),
            ),
            (
                RawInput {
                    popularity: String::from("4.5"),
                    ..hello()
                },
                ValidationError::PopularityNotNumeric(String::from("4.5")),
            ),
            (
                RawInput {
                    popularity: String::new(),
                    ..hello()
                },
                ValidationError::PopularityNotNumeric(String::new()),
            ),
        ];

        let site = Site::new()?;
        std::fs::write(&site.index_file, "[]")?;
        for (raw, wanted) in cases {
            match site.publisher().publish_on(raw, june_fifth()) {
                Err(Error::Validation(err)) => assert_eq!(wanted, err),
                other => panic!("wanted {:?}, got {:?}", wanted, other),
            }
            assert_eq!("[]", std::fs::read_to_string(&site.index_file)?);
            assert!(!site.output_directory.exists());
        }
        Ok(())
    }

    #[test]
    fn test_validation_order() {
        let raw = RawInput {
            title: String::new(),
            popularity: String::from("nope"),
            ..hello()
        };
        assert_eq!(
            Err(ValidationError::MissingField(Field::Title)),
            validate(&raw).map(|_| ()),
        );
    }

    #[test]
    fn test_html_write_failure_leaves_index_alone() -> TestResult {
        let site = Site::new()?;
        std::fs::write(&site.index_file, "[]")?;
        // A directory where the page should go makes the page write fail.
        std::fs::create_dir_all(site.output_directory.join("post1.html"))?;

        match site.publisher().publish_on(hello(), june_fifth()) {
            Err(Error::WriteHtml { path, .. }) => {
                assert_eq!(site.output_directory.join("post1.html"), path)
            }
            other => panic!("wanted WriteHtml error, got {:?}", other),
        }
        assert_eq!("[]", std::fs::read_to_string(&site.index_file)?);
        Ok(())
    }

    #[test]
    fn test_index_write_failure_orphans_page() -> TestResult {
        let site = Site::new()?;
        // Reads as a missing index, but can't be written.
        let index_file = site.dir.path().join("missing").join("posts.json");
        let publisher = Publisher {
            index_file: &index_file,
            ..site.publisher()
        };

        match publisher.publish_on(hello(), june_fifth()) {
            Err(Error::WriteIndex { path, .. }) => assert_eq!(index_file, path),
            other => panic!("wanted WriteIndex error, got {:?}", other),
        }
        assert!(site.output_directory.join("post1.html").exists());
        assert!(!index_file.exists());
        Ok(())
    }

    #[test]
    fn test_unreadable_index_is_an_error() -> TestResult {
        let site = Site::new()?;
        std::fs::create_dir(&site.index_file)?;

        match site.publisher().publish_on(hello(), june_fifth()) {
            Err(Error::ReadIndex { path, .. }) => assert_eq!(site.index_file, path),
            other => panic!("wanted ReadIndex error, got {:?}", other),
        }
        assert!(!site.output_directory.exists());
        Ok(())
    }
}
