//! 시계 설정 앱 결과 XML 파서.
//!
//! ```xml
//! <Application>
//!   <SettingsResult>
//!     <Item id="showdate"><Option checked="yes"/></Item>
//!     <Item id="clock_font"><Option selected="3"/></Item>
//!     <Item id="clock_font_color"><Option selected="5"/></Item>
//!   </SettingsResult>
//! </Application>
//! ```
//!
//! `/Application/SettingsResult/Item` 이 하나도 없으면 실패한다.

use clockwidget_core::error::CoreError;
use clockwidget_core::models::clock::{ClockFont, ClockSettings, FontColor};
use clockwidget_core::ports::settings::SettingsParser;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

/// Item 요소의 부모 경로
const ITEM_PARENT: [&str; 2] = ["Application", "SettingsResult"];

#[derive(Debug, Default, Clone, Copy)]
pub struct XmlSettingsParser;

impl XmlSettingsParser {
    pub fn new() -> Self {
        Self
    }
}

fn settings_error(message: impl Into<String>) -> CoreError {
    CoreError::Settings(message.into())
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart, key: &str) -> Result<Option<String>, CoreError> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| settings_error(format!("속성 {key} 읽기 실패: {err}")))?;
    match attr {
        Some(attr) => attr
            .unescape_value()
            .map(|v| Some(v.into_owned()))
            .map_err(|err| settings_error(format!("속성 {key} 해석 실패: {err}"))),
        None => Ok(None),
    }
}

/// atoi 호환: 앞쪽 숫자만 읽고 없으면 0
fn leading_int(value: &str) -> i32 {
    let trimmed = value.trim_start();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse().unwrap_or(0)
}

/// Item 자식 요소 하나를 설정에 반영
fn apply_option(item_id: &str, option: &BytesStart, settings: &mut ClockSettings) -> Result<(), CoreError> {
    match item_id {
        "showdate" => match attribute(option, "checked")?.as_deref() {
            Some("yes") => settings.show_date = true,
            Some("no") => settings.show_date = false,
            Some(other) => debug!("showdate: 알 수 없는 checked 값 {other}"),
            None => {}
        },
        "clock_font" => {
            if let Some(selected) = attribute(option, "selected")? {
                settings.font = ClockFont::from_index(leading_int(&selected));
            }
        }
        "clock_font_color" => {
            if let Some(selected) = attribute(option, "selected")? {
                settings.font_color = FontColor::from_index(leading_int(&selected));
            }
        }
        other => debug!("처리하지 않는 설정 항목: {other}"),
    }
    Ok(())
}

impl SettingsParser for XmlSettingsParser {
    fn parse_settings(&self, xml: &str) -> Result<ClockSettings, CoreError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut settings = ClockSettings::default();
        let mut path: Vec<String> = Vec::new();
        let mut current_item: Option<String> = None;
        let mut item_count = 0usize;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(settings_error(format!("XML 파싱 실패: {e}"))),
            };

            let (start, is_empty) = match &event {
                Event::Start(e) => (e, false),
                Event::Empty(e) => (e, true),
                Event::End(_) => {
                    if path.len() == ITEM_PARENT.len() + 1 {
                        current_item = None;
                    }
                    path.pop();
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            let name = element_name(start);
            if path == ITEM_PARENT && name == "Item" {
                item_count += 1;
                let Some(id) = attribute(start, "id")? else {
                    warn!("id 없는 설정 항목: 이후 항목 무시");
                    break;
                };
                if !is_empty {
                    current_item = Some(id);
                }
            } else if path.len() == ITEM_PARENT.len() + 1 {
                if let Some(item_id) = &current_item {
                    apply_option(item_id, start, &mut settings)?;
                }
            }

            if !is_empty {
                path.push(name);
            }
        }

        if item_count == 0 {
            return Err(settings_error("설정 항목 없음"));
        }
        debug!("설정 결과: {:?}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Application>
  <SettingsResult>
    <Item id="showdate">
      <Option checked="yes"/>
    </Item>
    <Item id="clock_font">
      <Option selected="3"/>
    </Item>
    <Item id="clock_font_color">
      <Option selected="5"/>
    </Item>
  </SettingsResult>
</Application>"#;

    #[test]
    fn parses_all_items() {
        let settings = XmlSettingsParser::new().parse_settings(FULL).unwrap();
        assert!(settings.show_date);
        assert_eq!(settings.font, ClockFont::Dynamic);
        assert_eq!(settings.font_color.index(), 5);
    }

    #[test]
    fn last_option_wins_and_out_of_range_color_falls_back() {
        let xml = r#"<Application><SettingsResult>
            <Item id="showdate"><A checked="yes"/><B checked="no"/></Item>
            <Item id="clock_font_color"><A selected="42"/></Item>
        </SettingsResult></Application>"#;
        let settings = XmlSettingsParser::new().parse_settings(xml).unwrap();
        assert!(!settings.show_date);
        assert_eq!(settings.font_color.index(), 8);
    }

    #[test]
    fn items_outside_settings_result_are_ignored() {
        let xml = r#"<Application><Item id="showdate"><A checked="yes"/></Item></Application>"#;
        assert!(matches!(
            XmlSettingsParser::new().parse_settings(xml),
            Err(CoreError::Settings(_))
        ));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        let xml = "<Application><SettingsResult></Application>";
        assert!(XmlSettingsParser::new().parse_settings(xml).is_err());
    }

    #[test]
    fn item_without_id_stops_parsing() {
        let xml = r#"<Application><SettingsResult>
            <Item id="clock_font"><A selected="2"/></Item>
            <Item><A selected="1"/></Item>
            <Item id="showdate"><A checked="yes"/></Item>
        </SettingsResult></Application>"#;
        let settings = XmlSettingsParser::new().parse_settings(xml).unwrap();
        assert_eq!(settings.font, ClockFont::Light);
        assert!(!settings.show_date);
    }

    #[test]
    fn atoi_semantics() {
        assert_eq!(leading_int("3"), 3);
        assert_eq!(leading_int(" 12px"), 12);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int("-1"), -1);
    }
}
