use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::{Res, error::SyncError};

/// Extracts the session key from an `auth.getSession` response, found as
/// the text of the `session/key` element.
pub fn session_key(xml: &str) -> Res<String> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => path.push(element_name(&e)),
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(text)) => {
                if path_ends_with(&path, &["session", "key"]) {
                    let key = String::from_utf8_lossy(&text).trim().to_string();
                    if !key.is_empty() {
                        return Ok(key);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
    }

    Err(SyncError::ResponseParse(
        "no session/key element in authorization response".to_string(),
    ))
}

/// Reads the `accepted` attribute of the `scrobbles` element from a
/// `track.scrobble` response. The submission counts as accepted only when
/// the attribute equals `"1"`.
pub fn scrobble_accepted(xml: &str) -> Res<bool> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if element_name(&e) == "scrobbles" {
                    return accepted_attribute(&e);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
    }

    Err(SyncError::ResponseParse(
        "no scrobbles element in scrobble response".to_string(),
    ))
}

fn accepted_attribute(element: &BytesStart<'_>) -> Res<bool> {
    let attr = element
        .try_get_attribute("accepted")
        .map_err(|e| SyncError::ResponseParse(e.to_string()))?;

    match attr {
        Some(attr) => Ok(attr.value.as_ref() == b"1"),
        None => Err(SyncError::ResponseParse(
            "scrobbles element carries no accepted attribute".to_string(),
        )),
    }
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn path_ends_with(path: &[String], tail: &[&str]) -> bool {
    path.len() >= tail.len()
        && path[path.len() - tail.len()..]
            .iter()
            .zip(tail)
            .all(|(a, b)| a == b)
}
