use std::fs;

use agora_core::{DataFiles, Error, Format, Post, SocialGraph, User};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sample_graph() -> SocialGraph {
    let mut graph = SocialGraph::new();
    for (name, pw) in [("alice", "p1"), ("bob", "p2"), ("carol", "p3")] {
        graph.signup(name, pw).unwrap();
    }
    let alice = graph.login("alice", "p1").unwrap();
    let bob = graph.login("bob", "p2").unwrap();
    let carol = graph.login("carol", "p3").unwrap();
    graph.send_friend_request(&alice, "bob").unwrap();
    graph.send_friend_request(&carol, "bob").unwrap();
    graph.accept_friend_request(&bob, 1).unwrap();
    graph.create_post(&alice, "hello").unwrap();
    graph.create_post(&carol, "").unwrap();
    graph.add_comment(&bob, 1, "hi").unwrap();
    graph.add_comment(&carol, 1, "hey there").unwrap();
    graph
}

/// `SocialGraph` equality treats friends as a set; this also pins their order.
fn assert_same(loaded: &SocialGraph, expected: &SocialGraph) {
    assert_eq!(loaded, expected);
    for (l, e) in loaded.users().iter().zip(expected.users()) {
        assert_eq!(l.friends().collect::<Vec<_>>(), e.friends().collect::<Vec<_>>());
    }
}

#[test]
fn missing_files_load_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path().join("nothing-here"), Format::Lines);
    let graph = files.load().unwrap();
    assert!(graph.users().is_empty());
    assert!(graph.posts().is_empty());
}

#[test]
fn round_trip_in_both_formats() {
    let graph = sample_graph();
    for format in [Format::Lines, Format::Json] {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::new(dir.path(), format);
        files.save(&graph).unwrap();
        assert_same(&files.load().unwrap(), &graph);
    }
}

#[test]
fn lines_format_is_the_original_layout() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path(), Format::Lines);
    files.save(&sample_graph()).unwrap();

    assert_eq!(
        fs::read_to_string(files.users_path()).unwrap(),
        "alice\np1\n1\nbob\n0\nbob\np2\n1\nalice\n1\ncarol\ncarol\np3\n0\n0\n"
    );
    assert_eq!(
        fs::read_to_string(files.posts_path()).unwrap(),
        "alice\nhello\n2\nbob\nhi\ncarol\nhey there\ncarol\n\n0\n"
    );
}

#[test]
fn save_creates_the_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path().join("a").join("b"), Format::Json);
    files.save(&sample_graph()).unwrap();
    assert!(files.users_path().exists());
    assert!(files.posts_path().exists());
}

#[test]
fn corrupt_users_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path(), Format::Lines);
    fs::write(files.users_path(), "alice\np1\nthree\n").unwrap();

    let err = files.load().unwrap_err();
    assert!(matches!(&err, Error::CorruptFile { path, .. } if *path == files.users_path()));
    let message = err.to_string();
    assert!(message.contains("users.txt"), "{message}");
    assert!(message.contains("line 3"), "{message}");
}

#[test]
fn truncated_posts_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path(), Format::Lines);
    fs::write(files.posts_path(), "alice\nhello\n2\nbob\nhi\ncarol\n").unwrap();

    let err = files.load().unwrap_err();
    assert!(matches!(&err, Error::CorruptFile { path, .. } if *path == files.posts_path()));
}

#[test]
fn reading_json_with_lines_format_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    DataFiles::new(dir.path(), Format::Json).save(&sample_graph()).unwrap();
    let err = DataFiles::new(dir.path(), Format::Lines).load().unwrap_err();
    assert!(matches!(err, Error::CorruptFile { .. }), "{err}");
}

#[test]
fn unencodable_content_leaves_previous_save_intact() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path(), Format::Lines);
    let mut graph = sample_graph();
    files.save(&graph).unwrap();
    let users_before = fs::read_to_string(files.users_path()).unwrap();
    let posts_before = fs::read_to_string(files.posts_path()).unwrap();

    let alice = graph.login("alice", "p1").unwrap();
    graph.create_post(&alice, "two\nlines").unwrap();
    let err = files.save(&graph).unwrap_err();
    assert!(matches!(&err, Error::UnencodableField { path, .. } if *path == files.posts_path()));

    assert_eq!(fs::read_to_string(files.users_path()).unwrap(), users_before);
    assert_eq!(fs::read_to_string(files.posts_path()).unwrap(), posts_before);
}

#[test]
fn unencodable_user_field_leaves_users_file_intact() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path(), Format::Lines);
    files.save(&sample_graph()).unwrap();
    let users_before = fs::read_to_string(files.users_path()).unwrap();

    let graph = SocialGraph::from_parts(vec![User::new("dave", "pass\nword")], Vec::new());
    let err = files.save(&graph).unwrap_err();
    assert!(matches!(&err, Error::UnencodableField { path, .. } if *path == files.users_path()));
    assert!(err.to_string().contains("users.txt"), "{err}");
    assert_eq!(fs::read_to_string(files.users_path()).unwrap(), users_before);
}

#[test]
fn username_with_whitespace_is_corrupt_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path(), Format::Json);
    fs::write(files.users_path(), "{\"username\":\"two words\",\"password\":\"p\"}\n").unwrap();

    let err = files.load().unwrap_err();
    assert!(matches!(&err, Error::CorruptFile { path, .. } if *path == files.users_path()));
}

#[test]
fn json_format_keeps_multi_line_content() {
    let dir = tempfile::tempdir().unwrap();
    let files = DataFiles::new(dir.path(), Format::Json);
    let mut graph = sample_graph();
    let bob = graph.login("bob", "p2").unwrap();
    graph.create_post(&bob, "line one\nline two").unwrap();
    graph.add_comment(&bob, 3, "a\r\nb").unwrap();
    files.save(&graph).unwrap();

    let loaded = files.load().unwrap();
    assert_eq!(loaded.posts()[2].content, "line one\nline two");
    assert_eq!(loaded.posts()[2].comments[0].content, "a\r\nb");
}

fn single_line() -> impl Strategy<Value = String> + Clone {
    "[^\r\n]{0,12}"
}

fn any_text() -> impl Strategy<Value = String> + Clone {
    ".{0,12}|[a-z\n\r]{0,12}"
}

fn arb_graph(
    field: impl Strategy<Value = String> + Clone,
) -> impl Strategy<Value = SocialGraph> {
    let user = (
        field.clone(),
        prop::collection::vec("[a-z]{1,6}", 0..4),
        prop::collection::vec("[a-z]{1,6}", 0..4),
    );
    let post = (
        "[a-z]{1,6}",
        field.clone(),
        prop::collection::vec(("[a-z]{1,6}", field), 0..4),
    );
    (
        prop::collection::btree_map("[a-z][a-z0-9_]{0,7}", user, 0..5),
        prop::collection::vec(post, 0..5),
    )
        .prop_map(|(users, posts)| {
            let users = users
                .into_iter()
                .map(|(username, (password, friends, requests))| {
                    let mut user = User::new(username, password);
                    for friend in friends {
                        user.add_friend(friend);
                    }
                    for from in requests {
                        user.receive_request(from);
                    }
                    user
                })
                .collect();
            let posts = posts
                .into_iter()
                .map(|(author, content, comments)| {
                    let mut post = Post::new(author, content);
                    for (author, content) in comments {
                        post.add_comment(author, content);
                    }
                    post
                })
                .collect();
            SocialGraph::from_parts(users, posts)
        })
}

proptest! {
    #[test]
    fn prop_lines_round_trip(graph in arb_graph(single_line())) {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::new(dir.path(), Format::Lines);
        files.save(&graph).unwrap();
        let loaded = files.load().unwrap();
        prop_assert_eq!(&loaded, &graph);
        for (l, g) in loaded.users().iter().zip(graph.users()) {
            prop_assert_eq!(l.friends().collect::<Vec<_>>(), g.friends().collect::<Vec<_>>());
        }
    }

    #[test]
    fn prop_json_round_trip(graph in arb_graph(any_text())) {
        let dir = tempfile::tempdir().unwrap();
        let files = DataFiles::new(dir.path(), Format::Json);
        files.save(&graph).unwrap();
        let loaded = files.load().unwrap();
        prop_assert_eq!(&loaded, &graph);
        for (l, g) in loaded.users().iter().zip(graph.users()) {
            prop_assert_eq!(l.friends().collect::<Vec<_>>(), g.friends().collect::<Vec<_>>());
        }
    }
}
