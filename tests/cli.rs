use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn movier(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("movier").unwrap();
    cmd.env("MOVIER_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("OMDB_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn write_marker(dir: &Path, title: &str, id: &str, rating: &str) {
    let movie_dir = dir.join(format!("{} (1999)", title));
    fs::create_dir_all(&movie_dir).unwrap();
    let marker = format!(
        r#"source:
  path: /downloads/{title}.mkv
  name: {title}
  year: "1999"
guessed: true
imdb:
  imdbID: {id}
  Title: {title}
  Year: "1999"
  Type: movie
  Genre: Action, Sci-Fi
  Director: Lana Wachowski, Lilly Wachowski
  Actors: Keanu Reeves, Laurence Fishburne
  Plot: A hacker learns the truth.
  Poster: N/A
  imdbRating: "{rating}"
  imdbVotes: "1,500,000"
"#
    );
    fs::write(movie_dir.join("imdb.txt"), marker).unwrap();
}

#[test]
fn genres_lists_the_vocabulary() {
    let home = tempfile::tempdir().unwrap();
    movier(home.path())
        .arg("genres")
        .assert()
        .success()
        .stdout(predicate::str::contains("Action").and(predicate::str::contains("Film-Noir")));
}

#[test]
fn find_on_empty_catalog_fails() {
    let home = tempfile::tempdir().unwrap();
    movier(home.path())
        .args(["find", "--no-play"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("add some movie boxes"));
}

#[test]
fn add_then_find_lists_the_movie() {
    let home = tempfile::tempdir().unwrap();
    let library = tempfile::tempdir().unwrap();
    write_marker(library.path(), "The Matrix", "tt0133093", "8.7");
    write_marker(library.path(), "Bad Movie", "tt0000002", "4.1");

    movier(home.path())
        .arg("add")
        .arg(library.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 2 new movies"));

    assert!(home.path().join("data.yaml").exists());

    movier(home.path())
        .args(["find", "matrix", "--no-play"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("001) 8.7 The Matrix [1999]")
                .and(predicate::str::contains("Bad Movie").not()),
        );

    movier(home.path())
        .args(["find", "--points", "5", "--no-play", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keanu Reeves"));
}

#[test]
fn adding_a_box_twice_warns_about_duplicates() {
    let home = tempfile::tempdir().unwrap();
    let library = tempfile::tempdir().unwrap();
    write_marker(library.path(), "The Matrix", "tt0133093", "8.7");

    movier(home.path()).arg("add").arg(library.path()).assert().success();
    movier(home.path())
        .arg("add")
        .arg(library.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists in the catalog"));
}

#[test]
fn add_rejects_unorganized_directories() {
    let home = tempfile::tempdir().unwrap();
    let library = tempfile::tempdir().unwrap();
    movier(home.path())
        .arg("add")
        .arg(library.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("movier organize"));
}

#[test]
fn tag_then_find_by_tag() {
    let home = tempfile::tempdir().unwrap();
    let library = tempfile::tempdir().unwrap();
    write_marker(library.path(), "The Matrix", "tt0133093", "8.7");
    write_marker(library.path(), "Other", "tt0000002", "6.1");
    movier(home.path()).arg("add").arg(library.path()).assert().success();

    movier(home.path())
        .args(["tag", "tt0133093", "--tags", "favorite"])
        .assert()
        .success();

    movier(home.path())
        .args(["find", "--tags", "favorite", "--no-play"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Matrix").and(predicate::str::contains("Other").not()));
}

#[test]
fn update_without_boxes_fails() {
    let home = tempfile::tempdir().unwrap();
    movier(home.path()).arg("update").assert().failure();
}

#[test]
fn config_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    movier(home.path())
        .args(["config", "retries", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("retries set to 5"));

    movier(home.path())
        .args(["config", "retries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5"));

    movier(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("retries = 5"));
}

#[test]
fn info_without_api_key_fails() {
    let home = tempfile::tempdir().unwrap();
    movier(home.path())
        .args(["info", "heat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OMDB_API_KEY"));
}
