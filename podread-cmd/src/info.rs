use std::io::{stdout, Write};
use std::path::Path;

use anyhow::{Context, Result};
use handlebars::handlebars_helper;
use podread::{header::trim, Bundle, FileHeader};
use serde::Serialize;

#[derive(Debug, Clone)]
pub enum Format {
    Json,
    Text,
}

impl clap::ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Json, Self::Text]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Self::Json => Some(clap::builder::PossibleValue::new("json")),
            Self::Text => Some(clap::builder::PossibleValue::new("text")),
        }
    }
}

#[derive(Default, Debug, Clone, Serialize)]
struct Summary {
    clicks: usize,
    minutes: usize,
    classified_clicks: usize,
    wav_clicks: usize,
    first_click_minute: Option<i32>,
    last_click_minute: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
struct Info {
    filename: String,
    pod_id: String,
    location: String,
    first_logged_min: i32,
    last_logged_min: i32,
    header: FileHeader,
    summary: Summary,
}

fn summarize(bundle: Bundle) -> Info {
    let minutes = match bundle.header {
        FileHeader::Fpod(_) => bundle.env.len(),
        // CPOD files carry no environment rows, so count minutes from the clicks
        FileHeader::Cpod(_) => bundle
            .clicks
            .last()
            .map_or(0, |c| usize::try_from(c.minute + 1).unwrap_or_default()),
    };
    let summary = Summary {
        clicks: bundle.clicks.len(),
        minutes,
        classified_clicks: bundle.num_classified(),
        wav_clicks: bundle.wav.len(),
        first_click_minute: bundle.clicks.first().map(|c| c.minute),
        last_click_minute: bundle.clicks.last().map(|c| c.minute),
    };

    Info {
        pod_id: bundle.header.pod_id(),
        location: trim(bundle.header.location_text()).to_string(),
        first_logged_min: bundle.header.first_logged_min(),
        last_logged_min: bundle.header.last_logged_min(),
        filename: bundle.filename,
        header: bundle.header,
        summary,
    }
}

pub fn info(fpath: &Path, format: &Format) -> Result<()> {
    let bundle = podread::read_pod_file(fpath).context("decoding input")?;
    let info = summarize(bundle);

    match format {
        Format::Json => {
            serde_json::to_writer_pretty(stdout(), &info).context("serializing to json")
        }
        Format::Text => {
            let data = render_text(&info).context("serializing info")?;
            stdout()
                .write_all(str::as_bytes(&data))
                .context("writing to stdout")
        }
    }
}

fn render_text(info: &Info) -> Result<String> {
    handlebars_helper!(or_dash: |v: Json| {
        match v {
            serde_json::Value::Null => "-".to_string(),
            serde_json::Value::String(s) => s.to_owned(),
            _ => v.to_string(),
        }
    });
    let mut hb = handlebars::Handlebars::new();
    hb.register_escape_fn(handlebars::no_escape);
    hb.register_helper("or_dash", Box::new(or_dash));
    assert!(hb.register_template_string("info", TEXT_TEMPLATE).is_ok());

    hb.render("info", &info).context("rendering text")
}

const TEXT_TEMPLATE: &str = r"{{ filename }}
===============================================================================
POD:         {{ pod_id }}
Location:    {{ location }}
Logged:      {{ first_logged_min }} - {{ last_logged_min }}
-------------------------------------------------------------------------------
Clicks:      {{ summary.clicks }}
Minutes:     {{ summary.minutes }}
Classified:  {{ summary.classified_clicks }}
Waveforms:   {{ summary.wav_clicks }}
Click mins:  {{ or_dash summary.first_click_minute }} - {{ or_dash summary.last_click_minute }}
";

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> Info {
        Info {
            filename: "x.CP1".to_string(),
            pod_id: "2043".to_string(),
            location: "Sound of Mull".to_string(),
            first_logged_min: 100,
            last_logged_min: 200,
            header: FileHeader::Cpod(podread::CpodHeader {
                pod_id: "2043".to_string(),
                first_logged_min: 100,
                last_logged_min: 200,
                water_depth: 0,
                deployment_depth: 0,
                lat_text: String::new(),
                lon_text: String::new(),
                location_text: "Sound of Mull".to_string(),
                notes_text: String::new(),
                clicks_in_cp1: None,
            }),
            summary: Summary::default(),
        }
    }

    #[test]
    fn text_output() {
        let text = render_text(&info()).unwrap();
        assert!(text.starts_with("x.CP1\n"));
        assert!(text.contains("POD:         2043\n"));
        assert!(text.contains("Logged:      100 - 200\n"));
        assert!(text.contains("Click mins:  - - -\n"), "{text}");
    }
}
