use std::fs;

use dapsync::paths::{LibraryRoots, PathRoots};
use dapsync::selection::state::{AudiobookSelection, MusicSelection, PlaylistSelection};
use dapsync::selection::{Mode, SelectionState, SelectionStore};

fn roots() -> LibraryRoots {
    LibraryRoots {
        music: PathRoots::new("/music", "/host/music/"),
        audiobooks: PathRoots::new("/audiobooks", "/host/audiobooks/"),
    }
}

fn music_selected(albums: &[&str]) -> SelectionState {
    SelectionState {
        music: MusicSelection {
            mode: Mode::Selected,
            albums: albums.iter().map(|s| s.to_string()).collect(),
        },
        ..SelectionState::default()
    }
}

#[test]
fn missing_file_reads_as_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = SelectionStore::new(dir.path().join("sync_selection.txt"), roots());
    let state = store.read();
    assert_eq!(state.music.mode, Mode::All);
    assert!(state.music.albums.is_empty());
    assert_eq!(state.audiobooks.mode, Mode::All);
    assert!(state.audiobooks.items.is_empty());
    assert!(state.playlists.ids.is_empty());
}

#[test]
fn unreadable_path_reads_as_default() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the file should be
    let store = SelectionStore::new(dir.path(), roots());
    assert_eq!(store.read(), SelectionState::default());
}

#[test]
fn malformed_json_reads_as_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    fs::write(&path, "{\"music\": [broken").unwrap();
    assert_eq!(SelectionStore::new(&path, roots()).read(), SelectionState::default());
}

#[test]
fn write_selected_album_emits_exact_host_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    SelectionStore::new(&path, roots())
        .write(&music_selected(&["X/Y"]))
        .unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.lines().any(|line| line == "MUSIC_ALBUM=/host/music/X/Y"));
    assert!(content.lines().any(|line| line == "ALL_AUDIOBOOKS=true"));
}

#[test]
fn write_clears_lists_of_all_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    let mut state = music_selected(&["X/Y"]);
    state.music.mode = Mode::All;
    SelectionStore::new(&path, roots()).write(&state).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "ALL_MUSIC=true\nALL_AUDIOBOOKS=true\n");
}

#[test]
fn write_replaces_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    let store = SelectionStore::new(&path, roots());
    store.write(&music_selected(&["A/B", "C/D"])).unwrap();
    store.write(&music_selected(&["E/F"])).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "MUSIC_ALBUM=/host/music/E/F\nALL_AUDIOBOOKS=true\n");
}

#[test]
fn write_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/nested/sync_selection.txt");
    SelectionStore::new(&path, roots())
        .write(&SelectionState::default())
        .unwrap();
    assert!(path.is_file());
}

#[test]
fn write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let store = SelectionStore::new(blocker.join("sync_selection.txt"), roots());
    assert!(store.write(&SelectionState::default()).is_err());
}

#[test]
fn selected_state_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = SelectionStore::new(dir.path().join("sync_selection.txt"), roots());
    let state = SelectionState {
        music: MusicSelection {
            mode: Mode::Selected,
            albums: vec!["Artist1/Album1".into(), "Beatles - Abbey Road".into()],
        },
        audiobooks: AudiobookSelection {
            mode: Mode::Selected,
            items: vec!["Book1.m4b".into(), "Series/Book2".into()],
        },
        playlists: PlaylistSelection {
            ids: vec!["p1".into(), "p2".into()],
        },
    };

    store.write(&state).unwrap();
    assert_eq!(store.read(), state);
}

#[test]
fn selected_section_with_no_entries_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    let store = SelectionStore::new(&path, roots());
    let state = music_selected(&[]);

    store.write(&state).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "ALL_MUSIC=false\nALL_AUDIOBOOKS=true\n"
    );
    let back = store.read();
    assert_eq!(back.music.mode, Mode::Selected);
    assert!(back.music.albums.is_empty());
    assert_eq!(back, state);
}

#[test]
fn entries_with_line_breaks_are_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    let store = SelectionStore::new(&path, roots());
    let mut state = music_selected(&["A/B\nALL_MUSIC=true", "C/D", "E/F\rX"]);
    state.playlists.ids = vec!["p1\nALL_AUDIOBOOKS=true".into(), "p2".into()];

    store.write(&state).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "MUSIC_ALBUM=/host/music/C/D\nALL_AUDIOBOOKS=true\nPLAYLIST_ID=p2\n"
    );

    let back = store.read();
    assert_eq!(back.music.mode, Mode::Selected);
    assert_eq!(back.music.albums, vec!["C/D"]);
    assert_eq!(back.playlists.ids, vec!["p2"]);
}

#[test]
fn legacy_mode_keyed_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    fs::write(&path, "MUSIC_MODE=selected\nMUSIC_ALBUM=/host/music/A/B\n").unwrap();

    let state = SelectionStore::new(&path, roots()).read();
    assert_eq!(state.music.mode, Mode::Selected);
    assert_eq!(state.music.albums, vec!["A/B"]);
}

#[test]
fn legacy_plain_list_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    fs::write(&path, "Artist1/Album1\nArtist2/Album2\n").unwrap();

    let state = SelectionStore::new(&path, roots()).read();
    assert_eq!(state.music.mode, Mode::Selected);
    assert_eq!(state.music.albums, vec!["Artist1/Album1", "Artist2/Album2"]);
    assert_eq!(state.audiobooks.mode, Mode::All);
}

#[cfg(unix)]
#[test]
fn written_file_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync_selection.txt");
    SelectionStore::new(&path, roots())
        .write(&SelectionState::default())
        .unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o644, 0o644);
}
