//! # scatter 子命令实现
//!
//! 不做光栅化，直接把衍射点画成散点图，并列出最强的衍射点。
//!
//! ## 依赖关系
//! - 使用 `cli/scatter.rs` 定义的 ScatterArgs
//! - 使用 `parsers/` 读取衍射点
//! - 使用 `diffraction/plot.rs` 绘图

use crate::cli::scatter::ScatterArgs;
use crate::cli::{parse_float_list, parse_pair};
use crate::diffraction::plot::{self, ScatterSpace};
use crate::error::{EdiffError, Result};
use crate::models::{Calibration, DiffractionSimulation};
use crate::parsers::{self, SpotOptions};
use crate::utils::output;

/// 执行 scatter 命令
pub fn execute(args: ScatterArgs) -> Result<()> {
    output::print_header("Diffraction Spot Preview");

    if !args.input.is_file() {
        return Err(EdiffError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let calibration = parse_float_list(&args.calibration)
        .map_err(EdiffError::InvalidCalibration)
        .and_then(|values| Calibration::from_slice(&values))?;
    let offset = parse_pair(&args.offset).map_err(EdiffError::InvalidArgument)?;

    let options = SpotOptions {
        calibration,
        offset,
        with_direct_beam: args.direct_beam,
    };
    let simulation = parsers::parse_spot_file(&args.input, &options)?;

    output::print_success(&format!(
        "Loaded {} spots from '{}'{}",
        simulation.len(),
        args.input.display(),
        if args.direct_beam {
            ""
        } else {
            " (direct beam masked)"
        }
    ));

    if simulation.is_empty() {
        output::print_warning("No spots to plot");
    }

    let space = if args.calibrated {
        let (cx, cy) = calibration.as_tuple();
        output::print_info(&format!(
            "Calibrated coordinates: offset ({}, {}) Å⁻¹, calibration ({}, {}) Å⁻¹/px",
            offset[0], offset[1], cx, cy
        ));
        ScatterSpace::Calibrated
    } else {
        ScatterSpace::Reciprocal
    };

    let title = args.title.clone().unwrap_or_else(|| {
        args.input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("spots")
            .to_string()
    });
    let use_svg = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    plot::render_scatter(
        &simulation,
        space,
        &args.output,
        &title,
        args.width,
        args.height,
        use_svg,
    )?;

    print_spot_table(&simulation, space, args.top);
    output::print_success(&format!("Preview saved to '{}'", args.output.display()));
    Ok(())
}

/// 打印最强衍射点表格
fn print_spot_table(simulation: &DiffractionSimulation, space: ScatterSpace, count: usize) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct SpotRow {
        #[tabled(rename = "x")]
        x: String,
        #[tabled(rename = "y")]
        y: String,
        #[tabled(rename = "I")]
        intensity: String,
        #[tabled(rename = "(hkl)")]
        hkl: String,
    }

    let coords = match space {
        ScatterSpace::Reciprocal => simulation.coordinates().to_vec(),
        ScatterSpace::Calibrated => simulation.calibrated_coordinates(),
    };

    let mut order: Vec<usize> = (0..simulation.len()).collect();
    order.sort_by(|&a, &b| {
        simulation.intensities()[b].total_cmp(&simulation.intensities()[a])
    });

    let rows: Vec<SpotRow> = order
        .into_iter()
        .take(count)
        .map(|i| SpotRow {
            x: format!("{:.4}", coords[i][0]),
            y: format!("{:.4}", coords[i][1]),
            intensity: format!("{:.3}", simulation.intensities()[i]),
            hkl: simulation
                .indices()
                .map(|idx| format!("({} {} {})", idx[i][0], idx[i][1], idx[i][2]))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("Top {} Spots", rows.len()));
        println!("{}", Table::new(&rows));
    }
}
