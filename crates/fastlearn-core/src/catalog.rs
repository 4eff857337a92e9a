//! The built-in course catalog.
//!
//! Seeded into the store once at startup. Courses whose `lang_key` is
//! already present are left untouched, so admin edits survive restarts.

use crate::course::VideoKind;

/// One course as shipped with the application.
#[derive(Debug, Clone, Copy)]
pub struct CourseSeed {
  pub lang_key:    &'static str,
  pub name:        &'static str,
  pub description: &'static str,
  pub video_id:    &'static str,
  pub video_kind:  VideoKind,
  pub icon:        &'static str,
  pub color:       &'static str,
  pub roadmap:     &'static [&'static str],
}

/// The eleven language tracks shipped by default.
pub const DEFAULT_CATALOG: &[CourseSeed] = &[
  CourseSeed {
    lang_key:    "html",
    name:        "HTML",
    description: "Learn HTML from scratch, the markup language of the web",
    video_id:    "cvNTgKw8VlY",
    video_kind:  VideoKind::Video,
    icon:        "fab fa-html5",
    color:       "#e34c26",
    roadmap: &[
      "Introduction to HTML and page structure",
      "Basic elements and tags",
      "Links and images",
      "Lists and tables",
      "Forms and inputs",
      "HTML5 and semantic elements",
      "A complete hands-on project",
    ],
  },
  CourseSeed {
    lang_key:    "css",
    name:        "CSS",
    description: "Learn CSS from scratch, styling and layout for web pages",
    video_id:    "h1mNPEjva8U",
    video_kind:  VideoKind::Video,
    icon:        "fab fa-css3-alt",
    color:       "#264de4",
    roadmap: &[
      "Introduction to CSS and selectors",
      "Colors and backgrounds",
      "Text and fonts",
      "The box model",
      "Layout with Flexbox",
      "CSS Grid",
      "Responsive design",
      "Transitions and animations",
    ],
  },
  CourseSeed {
    lang_key:    "javascript",
    name:        "JavaScript",
    description: "Learn JavaScript, the core programming language of the web",
    video_id:    "PLknwEmKsW8OuTqUDaFRBiAViDZ5uI3VcE",
    video_kind:  VideoKind::Playlist,
    icon:        "fab fa-js",
    color:       "#f0db4f",
    roadmap: &[
      "JavaScript fundamentals",
      "Variables and types",
      "Operators and conditionals",
      "Loops and functions",
      "Objects and arrays",
      "DOM manipulation",
      "Events",
      "Modern ES6+ features",
      "Async programming",
    ],
  },
  CourseSeed {
    lang_key:    "nodejs",
    name:        "Node.js",
    description: "Learn Node.js, server-side programming with JavaScript",
    video_id:    "qmvjwRbtNww",
    video_kind:  VideoKind::Video,
    icon:        "fab fa-node-js",
    color:       "#68a063",
    roadmap: &[
      "Introduction to Node.js",
      "Setting up the environment",
      "NPM and package management",
      "Building an HTTP server",
      "The Express framework",
      "Working with databases",
      "RESTful APIs",
      "Authentication and security",
    ],
  },
  CourseSeed {
    lang_key:    "php",
    name:        "PHP",
    description: "Learn PHP, the server-side language of the web",
    video_id:    "PLeWmXrh00479LgmvKAdU8WV2nRXqX4ley",
    video_kind:  VideoKind::Playlist,
    icon:        "fab fa-php",
    color:       "#4f5b93",
    roadmap: &[
      "PHP fundamentals",
      "Variables and types",
      "Functions and files",
      "Object-oriented PHP",
      "Working with MySQL",
      "Building a login system",
      "The Laravel framework",
      "Hands-on projects",
    ],
  },
  CourseSeed {
    lang_key:    "c",
    name:        "C",
    description: "Learn C, the foundation of modern programming",
    video_id:    "PLoP3S2S1qTfCe3hI4f-spGxg2kHOig33Z",
    video_kind:  VideoKind::Playlist,
    icon:        "fas fa-code",
    color:       "#00599c",
    roadmap: &[
      "Basic program structure",
      "Variables and constants",
      "Arithmetic operations",
      "Conditionals and loops",
      "Functions",
      "Arrays",
      "Pointers",
      "Structures",
      "Working with files",
    ],
  },
  CourseSeed {
    lang_key:    "cpp",
    name:        "C++",
    description: "Learn C++ and object-oriented programming",
    video_id:    "07AC2Syf4Yg",
    video_kind:  VideoKind::Video,
    icon:        "fas fa-code",
    color:       "#00599c",
    roadmap: &[
      "C++ fundamentals",
      "Object-oriented programming",
      "Classes and objects",
      "Inheritance",
      "Polymorphism",
      "The standard library",
      "Templates",
      "Exception handling",
      "Advanced projects",
    ],
  },
  CourseSeed {
    lang_key:    "java",
    name:        "Java",
    description: "Learn Java, a powerful cross-platform language",
    video_id:    "xND0t1pr3KY",
    video_kind:  VideoKind::Video,
    icon:        "fab fa-java",
    color:       "#5382a1",
    roadmap: &[
      "Introduction to Java",
      "Language fundamentals",
      "Object-oriented programming",
      "Collections",
      "Exception handling",
      "Files and I/O",
      "Swing GUIs",
      "Databases with JDBC",
      "Hands-on projects",
    ],
  },
  CourseSeed {
    lang_key:    "dart",
    name:        "Dart",
    description: "Learn Dart, the Flutter language for mobile apps",
    video_id:    "HF2fQ-o_qek",
    video_kind:  VideoKind::Video,
    icon:        "fas fa-mobile-alt",
    color:       "#0175c2",
    roadmap: &[
      "Introduction to Dart",
      "Language fundamentals",
      "Object-oriented Dart",
      "Asynchronous programming",
      "Introduction to Flutter",
      "Building user interfaces",
      "State management",
      "Complete mobile apps",
    ],
  },
  CourseSeed {
    lang_key:    "csharp",
    name:        "C#",
    description: "Learn C#, Microsoft's language for applications",
    video_id:    "eeRw__TlgmQ",
    video_kind:  VideoKind::Video,
    icon:        "fas fa-hashtag",
    color:       "#239120",
    roadmap: &[
      "C# fundamentals",
      "The .NET framework",
      "Object-oriented programming",
      "Windows Forms",
      "Desktop applications",
      "ASP.NET for the web",
      "Game development with Unity",
      "Advanced projects",
    ],
  },
  CourseSeed {
    lang_key:    "python",
    name:        "Python",
    description: "Learn Python, a friendly and powerful first language",
    video_id:    "mvZHDpCHphk",
    video_kind:  VideoKind::Video,
    icon:        "fab fa-python",
    color:       "#306998",
    roadmap: &[
      "Introduction to Python",
      "Variables and types",
      "Conditionals and loops",
      "Functions and modules",
      "Object-oriented programming",
      "Working with files",
      "Popular libraries",
      "Data analysis",
      "Artificial intelligence",
    ],
  },
];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn catalog_keys_are_unique() {
    let mut keys: Vec<&str> = DEFAULT_CATALOG.iter().map(|s| s.lang_key).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), DEFAULT_CATALOG.len());
  }

  #[test]
  fn every_course_has_a_roadmap() {
    for seed in DEFAULT_CATALOG {
      assert!(!seed.roadmap.is_empty(), "{} has no steps", seed.lang_key);
    }
  }
}
