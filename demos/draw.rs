/// This demo is like a visual debugger, it can draw each insertion step
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use triangulator::{
    loader::{Loader, PlainFileLoader},
    Context, Observer, Point, PointId, Predicates, Triangle, TriangulatorBuilder,
};
use utils::draw_svg;
mod utils;

/// Triangulate a point file, or a random cloud, and draw it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Point file, one `x y` pair per line
    #[arg(short, long)]
    path: Option<std::path::PathBuf>,

    /// Number of random points used when no path is given
    #[arg(long, default_value = "100")]
    random: usize,

    #[arg(long, default_value = "0")]
    seed: u64,

    /// Draw only the result into this svg
    #[arg(short, long)]
    output: Option<std::path::PathBuf>,

    /// Directory receiving one svg per step
    #[arg(long, default_value = "frames")]
    frames: std::path::PathBuf,

    #[arg(long, default_value = "false")]
    robust: bool,

    #[arg(long, default_value = "false")]
    debug: bool,

    #[arg(long, default_value = "1")]
    bench_count: usize,

    #[arg(long, default_value = "1000")]
    frame_count: usize,
}

fn main() {
    let args = Args::parse();

    let points = match args.path.as_ref() {
        Some(path) => PlainFileLoader::default()
            .load(path.as_os_str().to_str().unwrap())
            .unwrap(),
        None => {
            let mut rng = StdRng::seed_from_u64(args.seed);
            (0..args.random)
                .map(|_| Point::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..800.0)))
                .collect()
        }
    };

    let predicates = if args.robust {
        Predicates::Robust
    } else {
        Predicates::Fast
    };
    let triangulator = TriangulatorBuilder::new().predicates(predicates).build();

    if let Some(output_path) = args.output {
        // draw result instead of debug
        draw_svg(&points, &triangulator.triangulate(&points), output_path);
        return;
    }

    if args.bench_count == 1 {
        let mut observer = DrawObserver::new(&args);
        let _result = triangulator.triangulate_with_observer(&points, &mut observer);
        observer.save(&args.frames);

        // measure time with dummy observer
        let start = std::time::Instant::now();
        let count = 100;
        for _ in 0..count {
            let _ = triangulator.triangulate(&points);
        }
        let end = std::time::Instant::now();
        let duration = end.duration_since(start) / count;
        println!("{:?} per triangulation", duration);
    } else {
        for _ in 0..args.bench_count {
            let _ = triangulator.triangulate(&points);
        }
    }
}

struct DrawObserver {
    messages: Vec<String>,
    // whether show debug info, like point_id and locations
    debug: bool,

    frame_count: usize,

    // whether all process done
    finalized: bool,

    point_count: u64,
    /// how many triangles were removed over all cavities
    bad_triangle_count: u64,

    /// svgs
    frames: Vec<String>,
    frame_messages: Vec<Vec<String>>,
}

impl DrawObserver {
    fn new(args: &Args) -> Self {
        Self {
            debug: args.debug,
            messages: Default::default(),
            finalized: false,
            frames: vec![],
            frame_messages: vec![],
            point_count: 0,
            bad_triangle_count: 0,
            frame_count: args.frame_count,
        }
    }

    fn save(&self, dir: &std::path::Path) {
        std::fs::create_dir_all(dir).unwrap();
        let mut log = String::new();
        for (idx, (frame, messages)) in self.frames.iter().zip(&self.frame_messages).enumerate() {
            std::fs::write(dir.join(format!("frame_{idx:05}.svg")), frame).unwrap();
            for message in messages {
                log.push_str(&format!("{idx:05}: {message}\n"));
            }
        }
        log.push_str(&format!(
            "points: {} bad triangles: {}\n",
            self.point_count, self.bad_triangle_count
        ));
        std::fs::write(dir.join("messages.txt"), log).unwrap();
    }
}

impl Observer for DrawObserver {
    fn cavity_carved(&mut self, point_id: PointId, context: &Context) {
        self.bad_triangle_count += context.bad_triangles().len() as u64;
        self.messages.push(format!(
            "cavity for {point_id:?}: {} bad triangles, {} boundary edges",
            context.bad_triangles().len(),
            context.boundary().len()
        ));
        self.draw(context.triangles.iter().copied(), Some(point_id), context);
    }

    fn exit_point_event(&mut self, point_id: PointId, context: &Context) {
        self.point_count += 1;
        let point = context.points.get_point(point_id).unwrap();
        self.messages.push(format!("point event: {point_id:?} {point:?}"));
        self.draw(context.triangles.iter().copied(), None, context);
    }

    fn finalized(&mut self, result: &[Triangle], context: &Context) {
        self.messages.push("finalized".into());
        self.finalized = true;
        self.draw(result.iter().copied(), None, context);
    }
}

impl DrawObserver {
    fn draw(
        &mut self,
        triangles: impl Iterator<Item = Triangle>,
        cavity_of: Option<PointId>,
        context: &Context,
    ) {
        if self.frames.len() >= self.frame_count {
            return;
        }

        use svg::Document;
        use svg::Node;

        #[derive(Debug, Clone, Copy)]
        struct MapRect {
            x: f64,
            y: f64,
            w: f64,
            h: f64,
        }

        // map rect with y flipped, svg's coordinate with origin at left-top
        #[derive(Debug)]
        struct Map {
            from: MapRect,
            to: MapRect,
        }

        impl Map {
            fn map_point(&self, p: Point) -> (f64, f64) {
                let x = (p.x - self.from.x) / self.from.w * self.to.w + self.to.x;
                let y = self.to.h - (p.y - self.from.y) / self.from.h * self.to.h + self.to.y;
                (x, y)
            }
        }

        // frame the real points, super triangle edges run off the canvas
        let mut min_x = f64::MAX;
        let mut max_x = f64::MIN;
        let mut min_y = f64::MAX;
        let mut max_y = f64::MIN;
        for (_, p) in context.points.iter_without_fake() {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let space = (max_x - min_x).max(max_y - min_y).max(1.) * 0.05; // give some space
        let from = MapRect {
            x: min_x - space,
            y: min_y - space,
            w: max_x - min_x + 2. * space,
            h: max_y - min_y + 2. * space,
        };
        let to = MapRect {
            x: 0.,
            y: 0.,
            w: 800.,
            h: 800.,
        };
        let map = Map { from, to };
        let corners = |t: &Triangle| {
            t.points
                .map(|id| map.map_point(context.points.get_point(id).unwrap()))
        };

        let mut doc = Document::new()
            .set("viewBox", (to.x, to.y, to.w, to.h))
            .set("style", "background-color: #F5F5F5");

        let fill = if self.finalized { "blue" } else { "clear" };
        for t in triangles {
            let [p0, p1, p2] = corners(&t);
            doc.append(triangle(p0, p1, p2, "gray", fill));
        }

        if cavity_of.is_some() {
            for t in context.bad_triangles() {
                let [p0, p1, p2] = corners(t);
                doc.append(triangle(p0, p1, p2, "red", "yellow"));
            }
            for edge in context.boundary() {
                let p = map.map_point(context.points.get_point(edge.p).unwrap());
                let q = map.map_point(context.points.get_point(edge.q).unwrap());
                doc.append(line(p, q, "red"));
            }
        }

        let point_r = 3.;
        for (id, point) in context.points.iter_without_fake() {
            let (x, y) = map.map_point(point);
            let color = if Some(id) == cavity_of { "red" } else { "black" };
            doc.append(circle((x, y), point_r, color));

            if self.debug {
                doc.append(text(
                    format!("({}) ({:.2}, {:.2})", id.as_usize(), point.x, point.y),
                    (x, y),
                ));
            }
        }

        self.frames.push(doc.to_string());
        self.frame_messages.push(std::mem::take(&mut self.messages));
    }
}

fn line(p: (f64, f64), q: (f64, f64), color: &str) -> svg::node::element::Line {
    svg::node::element::Line::new()
        .set("class", "edge")
        .set("stroke", to_color(color))
        .set("stroke-width", 2)
        .set("x1", p.0)
        .set("y1", p.1)
        .set("x2", q.0)
        .set("y2", q.1)
}

fn text(content: impl Into<String>, p: (f64, f64)) -> svg::node::element::Text {
    svg::node::element::Text::new()
        .add(svg::node::Text::new(content))
        .set("x", p.0)
        .set("y", p.1)
}

fn triangle(
    p0: (f64, f64),
    p1: (f64, f64),
    p2: (f64, f64),
    border_color: &str,
    fill_color: &str,
) -> svg::node::element::Path {
    let data = svg::node::element::path::Data::new()
        .move_to(p0)
        .line_to(p1)
        .line_to(p2)
        .close();

    svg::node::element::Path::new()
        .set("d", data)
        .set("stroke", to_color(border_color))
        .set("fill", to_color(fill_color))
}

fn circle(c: (f64, f64), r: f64, color: &str) -> svg::node::element::Circle {
    svg::node::element::Circle::new()
        .set("cx", c.0)
        .set("cy", c.1)
        .set("r", r)
        .set("fill", to_color(color))
}

fn to_color(name: &str) -> String {
    match name {
        "blue" => "#29B6F6",
        "yellow" => "#FFA726",
        "red" => "#EF5350",
        "black" => "#3E2723",
        "gray" => "#616161",
        "clear" => "#00000000",
        _ => name,
    }
    .into()
}
