use movie_catalog::models::{Movie, MovieRequest, NewMovie, User};
use validator::Validate;

fn valid_request() -> MovieRequest {
    MovieRequest {
        name: "The Wizard of Oz".to_string(),
        director: "Victor Fleming".to_string(),
        genre: vec![" Adventure".to_string(), "Family ".to_string(), "Fantasy".to_string()],
        imdb_score: 8.3,
        popularity: 83.0,
    }
}

#[test]
fn test_user_serialized_excludes_password_hash() {
    let user = User {
        id: 3,
        name: "carol".to_string(),
        password_hash: "secret-hash".to_string(),
        admin: true,
    };

    let json = serde_json::to_value(user.serialized()).unwrap();

    assert_eq!(json, serde_json::json!({ "id": 3, "name": "carol", "admin": true }));
}

#[test]
fn test_movie_popularity_uses_99popularity_key() {
    let movie = Movie {
        id: 1,
        name: "Heat".to_string(),
        director: "Michael Mann".to_string(),
        genre: "Crime,Drama".to_string(),
        imdb_score: 8.3,
        popularity: 70.0,
    };

    let json = serde_json::to_string(&movie).unwrap();

    assert!(json.contains(r#""99popularity":70.0"#));
    assert!(!json.contains(r#""popularity""#));
}

#[test]
fn test_movie_request_reads_99popularity() {
    let body = r#"{"name":"Heat","director":"Michael Mann","genre":["Crime"],"imdb_score":8.3,"99popularity":70.0}"#;
    let req: MovieRequest = serde_json::from_str(body).unwrap();
    assert_eq!(req.popularity, 70.0);
}

#[test]
fn test_genre_entries_are_trimmed_and_comma_joined() {
    let new_movie = NewMovie::from(valid_request());
    assert_eq!(new_movie.genre, "Adventure,Family,Fantasy");
}

#[test]
fn test_valid_request_passes_validation() {
    assert!(valid_request().validate().is_ok());
}

#[test]
fn test_out_of_range_scores_fail_validation() {
    let req = MovieRequest {
        imdb_score: 11.0,
        popularity: -1.0,
        ..valid_request()
    };

    let errors = req.validate().unwrap_err();
    let fields = errors.field_errors();
    assert!(fields.contains_key("imdb_score"));
    // The key follows the serde name when one is declared.
    assert!(fields.contains_key("99popularity") || fields.contains_key("popularity"));
}

#[test]
fn test_empty_name_fails_validation() {
    let req = MovieRequest {
        name: String::new(),
        ..valid_request()
    };
    assert!(req.validate().unwrap_err().field_errors().contains_key("name"));
}
