//! Directory client against recorded directory responses

mod common;

use anyhow::Result;
use common::{directory, serve_once, url};
use pmoradios::{
    CategoryType, OnlineRadioInfo, ResultCategory, Station, StationDetails, PLACEHOLDER_PICTURE,
};

#[test]
fn recommended_stations() -> Result<()> {
    let (client, log) = directory();

    let stations: Vec<Station> = client.get_recommended_stations()?.collect();
    assert_eq!(stations.len(), 4);
    assert_eq!(
        log.urls(),
        vec![url("broadcast/editorialreccomendationsembedded")]
    );

    let vmix = &stations[0];
    assert_eq!(vmix.id(), 2511);
    assert_eq!(vmix.name(), "Vmix Late");
    assert_eq!(
        vmix.picture_url(),
        "http://static.radio.de/images/broadcasts/2511_1.gif"
    );
    assert_eq!(vmix.genres(), ["Electro", "Lounge"]);
    assert!(vmix.decades().is_empty());

    let oldies = &stations[2];
    assert_eq!(oldies.picture_url(), PLACEHOLDER_PICTURE);
    assert_eq!(oldies.genres(), ["Oldies"]);
    assert_eq!(oldies.decades(), [1960, 1970]);
    Ok(())
}

#[test]
fn top_stations() -> Result<()> {
    let (client, log) = directory();

    let stations = client.get_top_stations()?;
    assert_eq!(stations.len(), 3);
    assert_eq!(
        log.urls(),
        vec![url("menu/broadcastsofcategory?category=_top&value=")]
    );
    Ok(())
}

#[test]
fn most_wanted_stations() -> Result<()> {
    let (client, log) = directory();

    let lists = client.get_most_wanted_stations(2)?;
    assert_eq!(
        log.urls(),
        vec![url("account/getmostwantedbroadcastlists?sizeoflists=2")]
    );

    let categories: Vec<ResultCategory> = lists.keys().copied().collect();
    assert_eq!(
        categories,
        vec![
            ResultCategory::Recommended,
            ResultCategory::Top,
            ResultCategory::Local
        ]
    );
    for (category, stations) in lists {
        assert_eq!(stations.count(), 2, "{category}");
    }
    Ok(())
}

#[test]
fn search_stations() -> Result<()> {
    let (client, log) = directory();

    let stations: Vec<Station> = client.get_stations_by_searchstring("jazz", 1000)?.collect();
    assert_eq!(stations.len(), 4);
    assert_eq!(stations[0].decades(), [1950]);
    assert_eq!(stations[3].decades(), [1970]);

    client.get_stations_by_searchstring("jazz", 42)?;
    assert_eq!(
        log.urls(),
        vec![
            url("index/searchembeddedbroadcast?q=jazz&start=0&rows=1000"),
            url("index/searchembeddedbroadcast?q=jazz&start=0&rows=42"),
        ]
    );
    Ok(())
}

#[test]
fn categories_and_category_stations() -> Result<()> {
    let (client, log) = directory();

    let genres = client.get_categories_by_category_type(CategoryType::Genre)?;
    assert!(genres.contains(&"Blues".to_string()));

    let blues: Vec<Station> = client
        .get_stations_by_category(CategoryType::Genre, "Blues")?
        .collect();
    assert_eq!(blues.len(), 2);
    assert!(blues.iter().all(|s| s.genres().contains(&"Blues".to_string())));

    assert_eq!(
        log.urls(),
        vec![
            url("menu/valuesofcategory?category=_genre"),
            url("menu/broadcastsofcategory?category=_genre&value=Blues"),
        ]
    );
    Ok(())
}

#[test]
fn station_details() -> Result<()> {
    let (client, _log) = directory();

    let details = client.get_details_by_station_id(2511)?;
    assert_eq!(
        details,
        StationDetails {
            city: Some("Paris".into()),
            current_track: Some("Megashira - At Last".into()),
            description: Some(
                "Makes your nights sweeter ! Programmation downtempo, soul et chillout par Vmix.\r\n"
                    .into()
            ),
            stream_urls: vec!["http://live2.vmix.fr:8010".into()],
            web_link: Some("http://www.vmix.fr/".into()),
        }
    );
    Ok(())
}

#[test]
fn station_not_broadcasting_has_empty_details() -> Result<()> {
    let (client, _log) = directory();

    let details = client.get_details_by_station_id(1417)?;
    assert!(details.is_empty());
    Ok(())
}

#[test]
fn playlist_stream_is_resolved() -> Result<()> {
    let (client, log) = directory();

    let details = client.get_details_by_station_id(3803)?;
    assert_eq!(
        details.stream_urls,
        vec!["http://awesome.net/trance.mp3", "http://awesome.net/dance.mp3"]
    );
    assert_eq!(log.count_matching("http://awesome.net/"), 1);
    Ok(())
}

#[test]
fn playlist_files() {
    let (client, log) = directory();

    let expected = vec!["http://awesome.net/trance.mp3", "http://awesome.net/dance.mp3"];
    assert_eq!(client.resolve_playlist("http://awesome.net/radio.m3u"), expected);
    assert_eq!(client.resolve_playlist("http://awesome.net/radio.pls"), expected);
    assert_eq!(
        client.resolve_playlist("http://awesome.net/invalid.m3u"),
        vec!["http://awesome.net/invalid.m3u"]
    );
    assert_eq!(
        client.resolve_playlist("http://awesome.net/invalid.pls"),
        vec!["http://awesome.net/invalid.pls"]
    );
    assert_eq!(log.count(), 4);

    assert_eq!(client.resolve_playlist("http://foo.net"), vec!["http://foo.net"]);
    assert_eq!(log.count(), 4);
}

#[test]
fn lazy_station_details() -> Result<()> {
    let (client, log) = directory();

    let station = client
        .get_recommended_stations()?
        .next()
        .expect("one recommended station");
    assert_eq!(station.id(), 2511);
    assert_eq!(station.current_track(), "Wahoo - Holding You");
    assert_eq!(log.count(), 1);

    assert_eq!(station.city()?.as_deref(), Some("Paris"));
    assert_eq!(log.count(), 2);
    assert_eq!(station.stream_urls()?, vec!["http://live2.vmix.fr:8010"]);
    assert_eq!(station.web_link()?.as_deref(), Some("http://www.vmix.fr/"));
    assert_eq!(log.count(), 2);
    Ok(())
}

#[test]
fn connection_errors() {
    let (client, _log) = directory();

    let err = client
        .get_stations_by_category(CategoryType::City, "Atlantis")
        .unwrap_err();
    assert!(err.is_connection());
    assert!(err.to_string().contains("category=_city&value=Atlantis"));
}

#[test]
#[ignore = "Integration test - calls real rad.io API"]
fn live_most_wanted() -> Result<()> {
    let client = pmoradios::OnlineRadioInfo::with_language("de");
    println!("{client}");

    for (category, stations) in client.get_most_wanted_stations(3)? {
        for station in stations {
            println!("[{category}] {} ({})", station.name(), station.country());
        }
    }
    Ok(())
}

#[test]
fn latin1_directory_answer_is_decoded() -> Result<()> {
    let base_url = serve_once(
        "200 OK",
        "application/json; charset=ISO-8859-1",
        b"[\"Ann\xE9es 90\", \"Schlager\"]",
    );
    let client = OnlineRadioInfo::builder().base_url(base_url).build();

    let genres = client.get_categories_by_category_type(CategoryType::Genre)?;
    assert_eq!(genres, ["Années 90", "Schlager"]);
    Ok(())
}

#[test]
fn server_error_is_a_connection_error() {
    let base_url = serve_once("500 Internal Server Error", "text/plain", b"boom");
    let client = OnlineRadioInfo::builder().base_url(base_url).build();

    let err = client
        .get_categories_by_category_type(CategoryType::Country)
        .unwrap_err();
    assert!(err.is_connection());
}
