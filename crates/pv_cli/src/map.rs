use std::path::Path;
use std::str::FromStr;
use pv_core::Error;
use pv_vis::{PlotLoader, PlotSource, ScatterPlot};

/// A pixel position on the rendered map, written `X,Y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl FromStr for PixelPoint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected X,Y but got: {}", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("Invalid coordinate {:?}: {}", v, e))
        };
        Ok(PixelPoint { x: parse(x)?, y: parse(y)? })
    }
}

pub async fn build_plot<S: PlotSource>(source: S, width: f64, height: f64) -> pv_core::Result<ScatterPlot> {
    PlotLoader::new(source)
        .display(width, height)
        .await?
        .ok_or_else(|| Error::External(anyhow::anyhow!("Scatterplot data is still loading")))
}

/// Write `svg` to `output`, or to stdout when `output` is `-`.
pub async fn write_svg(svg: &str, output: &Path) -> pv_core::Result<()> {
    if output == Path::new("-") {
        print!("{}", svg);
        return Ok(());
    }
    tokio::fs::write(output, svg).await?;
    Ok(())
}
