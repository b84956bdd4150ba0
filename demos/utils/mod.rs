use triangulator::{Point, Triangle};

pub fn draw_svg(points: &[Point], triangles: &[Triangle], path: std::path::PathBuf) {
    use svg::Document;
    use svg::Node;

    // calculate view box
    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;
    for p in points {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }

    let mut doc = Document::new().set("style", "background-color: #F5F5F5");

    for t in triangles {
        let [a, b, c] = t.indices().map(|i| points[i as usize]);
        let data = svg::node::element::path::Data::new()
            .move_to((a.x, a.y))
            .line_to((b.x, b.y))
            .line_to((c.x, c.y))
            .close();

        doc.append(
            svg::node::element::Path::new()
                .set("d", data)
                .set("stroke", "white")
                .set("stroke-width", (x_max - x_min) / 400.)
                .set("fill", "#29B6F6"),
        );
    }

    let doc = doc.set("viewBox", (x_min, y_min, x_max - x_min, y_max - y_min));
    svg::save(path, &doc).unwrap();
}
