//! Command-line front end for quaternion computations.
//!
//! Quaternions are given as four numbers `a b c d`, vectors as `x,y,z`.
//!
//! ```bash
//! quat rotation --angle 1.5707963 --axis 0,0,1
//! quat axis-angle 0.7071 0 0 0.7071
//! quat product --lhs 0 1 0 0 --rhs 0 0 1 0
//! quat cross --lhs 0 1 0 0 --rhs 0 0 1 0
//! quat rotate 0.7071 0 0 0.7071 --vector 1,0,0
//! ```

use apex_quaternion::{Quaternion, QuaternionError, QuaternionResult, init_logger_with_level};
use clap::{Parser, Subcommand};
use nalgebra::Vector3;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "quat")]
#[command(about = "Quaternion algebra and rotation conversions")]
struct Args {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Unit quaternion for a rotation of ANGLE radians about AXIS
    Rotation {
        #[arg(long, allow_negative_numbers = true)]
        angle: f64,
        #[arg(long, value_parser = parse_vector3, allow_hyphen_values = true)]
        axis: Vector3<f64>,
    },
    /// Rotation angle and unit axis of a quaternion
    AxisAngle {
        #[arg(num_args = 4, required = true, allow_negative_numbers = true)]
        q: Vec<f64>,
    },
    /// Hamilton product LHS * RHS
    Product {
        #[arg(long, num_args = 4, required = true, allow_negative_numbers = true)]
        lhs: Vec<f64>,
        #[arg(long, num_args = 4, required = true, allow_negative_numbers = true)]
        rhs: Vec<f64>,
    },
    /// Vector cross product (0, LHS.vector × RHS.vector)
    Cross {
        #[arg(long, num_args = 4, required = true, allow_negative_numbers = true)]
        lhs: Vec<f64>,
        #[arg(long, num_args = 4, required = true, allow_negative_numbers = true)]
        rhs: Vec<f64>,
    },
    /// Checked multiplicative inverse
    Inverse {
        #[arg(num_args = 4, required = true, allow_negative_numbers = true)]
        q: Vec<f64>,
    },
    /// Conjugate (a, -b, -c, -d)
    Conjugate {
        #[arg(num_args = 4, required = true, allow_negative_numbers = true)]
        q: Vec<f64>,
    },
    /// Euclidean length
    Length {
        #[arg(num_args = 4, required = true, allow_negative_numbers = true)]
        q: Vec<f64>,
    },
    /// 4x4 real matrix form
    Matrix {
        #[arg(num_args = 4, required = true, allow_negative_numbers = true)]
        q: Vec<f64>,
    },
    /// Rotate VECTOR by the rotation of the quaternion
    Rotate {
        #[arg(num_args = 4, required = true, allow_negative_numbers = true)]
        q: Vec<f64>,
        #[arg(long, value_parser = parse_vector3, allow_hyphen_values = true)]
        vector: Vector3<f64>,
    },
}

fn parse_vector3(s: &str) -> QuaternionResult<Vector3<f64>> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(QuaternionError::InvalidInput(format!(
            "expected 3 comma-separated values, got {}",
            parts.len()
        ))),
    }
}

fn to_quaternion(values: &[f64]) -> QuaternionResult<Quaternion> {
    match values {
        [a, b, c, d] => Ok(Quaternion::new(*a, *b, *c, *d)),
        _ => Err(QuaternionError::InvalidInput(format!(
            "expected 4 quaternion components, got {}",
            values.len()
        ))),
    }
}

fn format_quaternion(q: &Quaternion) -> String {
    let [a, b, c, d] = q.coords();
    format!("{a} {b} {c} {d}")
}

fn run(command: Command) -> QuaternionResult<()> {
    match command {
        Command::Rotation { angle, axis } => {
            debug!("rotation of {} rad about {:?}", angle, axis);
            let q = Quaternion::rotation(angle, &axis);
            println!("{}", format_quaternion(&q));
        }
        Command::AxisAngle { q } => {
            let q = to_quaternion(&q)?;
            let rotation = q.to_axis_angle()?;
            println!("angle: {}", rotation.angle);
            println!(
                "axis: {},{},{}",
                rotation.axis.x, rotation.axis.y, rotation.axis.z
            );
        }
        Command::Product { lhs, rhs } => {
            let p = to_quaternion(&lhs)?;
            let q = to_quaternion(&rhs)?;
            println!("{}", format_quaternion(&Quaternion::product(&p, &q)));
        }
        Command::Cross { lhs, rhs } => {
            let p = to_quaternion(&lhs)?;
            let q = to_quaternion(&rhs)?;
            println!("{}", format_quaternion(&Quaternion::cross_product(&p, &q)));
        }
        Command::Inverse { q } => {
            let mut q = to_quaternion(&q)?;
            q.invert()?;
            println!("{}", format_quaternion(&q));
        }
        Command::Conjugate { q } => {
            let q = to_quaternion(&q)?;
            println!("{}", format_quaternion(&q.conjugate()));
        }
        Command::Length { q } => {
            let q = to_quaternion(&q)?;
            println!("{}", q.length());
        }
        Command::Matrix { q } => {
            let m = to_quaternion(&q)?.matrix_form();
            for row in m.row_iter() {
                println!("{} {} {} {}", row[0], row[1], row[2], row[3]);
            }
        }
        Command::Rotate { q, vector } => {
            let q = to_quaternion(&q)?;
            let rotated = q.rotate(&vector);
            println!("{},{},{}", rotated.x, rotated.y, rotated.z);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_logger_with_level(level);

    if let Err(err) = run(args.command) {
        error!("quat failed: {}", err);
        return Err(err.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector3() {
        assert_eq!(
            parse_vector3("1, -2.5,3").unwrap(),
            Vector3::new(1.0, -2.5, 3.0)
        );
        assert!(matches!(
            parse_vector3("1,2"),
            Err(QuaternionError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_vector3("1,x,2"),
            Err(QuaternionError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_to_quaternion() {
        assert_eq!(
            to_quaternion(&[1.0, 2.0, 3.0, 4.0]).unwrap(),
            Quaternion::new(1.0, 2.0, 3.0, 4.0)
        );
        assert!(to_quaternion(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let args = Args::try_parse_from([
            "quat", "product", "--lhs", "0", "1", "0", "0", "--rhs", "0", "0", "1", "0",
        ])
        .unwrap();
        match args.command {
            Command::Product { lhs, rhs } => {
                let p = to_quaternion(&lhs).unwrap();
                let q = to_quaternion(&rhs).unwrap();
                assert_eq!(p * q, Quaternion::K);
            }
            _ => panic!("Expected product command"),
        }

        let args = Args::try_parse_from([
            "quat", "cross", "--lhs", "0", "1", "0", "0", "--rhs", "0", "0", "1", "0",
        ])
        .unwrap();
        match args.command {
            Command::Cross { lhs, rhs } => {
                let p = to_quaternion(&lhs).unwrap();
                let q = to_quaternion(&rhs).unwrap();
                assert_eq!(Quaternion::cross_product(&p, &q), Quaternion::K);
            }
            _ => panic!("Expected cross command"),
        }
        assert!(Args::try_parse_from(["quat", "product", "0", "1", "0", "0"]).is_err());

        let args = Args::try_parse_from([
            "quat", "-v", "rotate", "1", "0", "0", "-1", "--vector", "-1,0,0",
        ])
        .unwrap();
        assert!(args.verbose);
        assert!(matches!(args.command, Command::Rotate { .. }));
    }

    #[test]
    fn test_run_reports_errors() {
        let result = run(Command::Inverse {
            q: vec![0.0, 0.0, 0.0, 0.0],
        });
        assert_eq!(result, Err(QuaternionError::NotInvertible));

        let result = run(Command::AxisAngle {
            q: vec![1.0, 0.0, 0.0, 0.0],
        });
        assert!(matches!(result, Err(QuaternionError::DegenerateRotation(_))));
    }
}
